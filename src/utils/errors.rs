//! Error handling for MortalShop
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the MortalShop bot
#[derive(Error, Debug)]
pub enum MortalShopError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("File download error: {0}")]
    Download(#[from] teloxide::DownloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No saved submission for user {user_id}")]
    SubmissionNotFound { user_id: i64 },

    #[error("No active design session for user {user_id}")]
    NoActiveSession { user_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for MortalShop operations
pub type Result<T> = std::result::Result<T, MortalShopError>;

impl MortalShopError {
    /// Map an error to the message shown to the user who triggered the request.
    ///
    /// Storage and gateway failures deliberately collapse into one generic
    /// message; only actionable errors get specific wording.
    pub fn user_message(&self) -> String {
        match self {
            MortalShopError::SubmissionNotFound { .. } => {
                "❌ You have no saved request yet. Fill out the design form via /start first.".to_string()
            }
            MortalShopError::NoActiveSession { .. } => {
                "❌ Start the design process from the menu first.".to_string()
            }
            MortalShopError::InvalidInput(text) => format!("❌ {}", text),
            _ => "❌ Something went wrong. Please try again or contact the administrator.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_mapping() {
        let err = MortalShopError::SubmissionNotFound { user_id: 42 };
        assert!(err.user_message().contains("/start"));

        let err = MortalShopError::Io(std::io::Error::other("disk on fire"));
        assert!(!err.user_message().contains("disk on fire"));
    }
}
