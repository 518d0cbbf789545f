use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::{info, warn};
use url::Url;

use common::console::{self, Tone};
use common::{Error, Notifier, Result};

/// Sends signal alerts to a fixed set of Telegram chats.
pub struct TelegramNotifier {
    bot: Bot,
    chat_ids: Vec<ChatId>,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_ids: &[i64]) -> Self {
        info!(chats = chat_ids.len(), "Telegram alerts enabled");
        Self {
            bot: Bot::new(token),
            chat_ids: chat_ids.iter().map(|&id| ChatId(id)).collect(),
        }
    }

    /// Route Bot API calls to another host.
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.bot = self.bot.set_api_url(api_url);
        self
    }
}

pub fn format_alert(subject: &str, body: &str) -> String {
    format!("{subject}\n{body}")
}

/// Console line for a send attempt: green once any chat got the alert,
/// red when none did.
fn delivery_line(delivered: usize, error: Option<&str>) -> (Tone, String) {
    match error {
        Some(e) if delivered == 0 => (Tone::Failure, format!("Error sending Telegram alert: {e}")),
        _ => (
            Tone::Success,
            format!("Telegram alert sent to {delivered} chat(s)."),
        ),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// Send to every chat. Succeeds if at least one chat got the message.
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        let message = format_alert(subject, body);
        let mut delivered = 0usize;
        let mut last_error = None;

        for &chat_id in &self.chat_ids {
            match self.bot.send_message(chat_id, message.as_str()).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    warn!(chat_id = ?chat_id, error = %e, "Failed to send Telegram alert");
                    last_error = Some(e.to_string());
                }
            }
        }

        if self.chat_ids.is_empty() {
            return Ok(());
        }
        let (tone, line) = delivery_line(delivered, last_error.as_deref());
        console::say(tone, &line);

        match last_error {
            Some(e) if delivered == 0 => Err(Error::Notification(e)),
            _ => {
                info!(delivered, subject = %subject, "Telegram alert sent");
                Ok(())
            }
        }
    }
}
