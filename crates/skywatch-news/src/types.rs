use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// News lookup errors
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl NewsError {
    /// User-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "News service unreachable. Check your connection.".to_string(),
            Self::Api { status, .. } => format!("News service error (status {})", status),
            Self::Parse(_) => "News service returned unexpected data.".to_string(),
        }
    }
}
