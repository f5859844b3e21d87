use reqwest::StatusCode;
use thiserror::Error;

/// Ways an `/ask` round trip can fail before a JSON value is in hand.
///
/// None of these reach the UI; the controller turns every variant into the
/// generic failure notice.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("request to Q&A service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Q&A service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Q&A service response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ask task aborted: {0}")]
    Aborted(String),
}

impl AskError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AskError::Transport(e) if e.is_timeout())
    }
}
