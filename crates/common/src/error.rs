use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Market data for one pair could not be retrieved. Recoverable: the
    /// scheduler cools down and skips the pair for the current pass.
    #[error("Fetch failed for {pair}: {reason}")]
    Fetch { pair: String, reason: String },

    #[error("Order submission failed: {0}")]
    Submission(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Exchange API error: {0}")]
    Exchange(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn fetch(pair: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch {
            pair: pair.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
