//! Coloured operator-facing console lines, printed alongside the tracing log.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Failure,
}

pub fn paint(tone: Tone, message: &str) -> String {
    match tone {
        Tone::Info => message.blue().to_string(),
        Tone::Success => message.green().to_string(),
        Tone::Warning => message.yellow().to_string(),
        Tone::Failure => message.red().to_string(),
    }
}

pub fn say(tone: Tone, message: &str) {
    println!("{}", paint(tone, message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painted_text_keeps_message() {
        colored::control::set_override(false);
        assert_eq!(paint(Tone::Failure, "Error placing order"), "Error placing order");
        colored::control::unset_override();
    }
}
