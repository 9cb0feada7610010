//! Feed-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed feed payload: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FeedError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { .. } => "The disaster feed returned an error".to_string(),
            Self::Parse(_) => "The disaster feed sent an unexpected response".to_string(),
            Self::Cache(_) => "Local cache error".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether retrying later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. })
    }
}
