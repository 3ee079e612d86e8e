//! Error types for the rating pipeline
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },

    #[error("Results feed error: {message}")]
    FeedError { message: String },

    #[error("Export failed: {message}")]
    ExportError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RatingError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_team(team: impl Into<String>) -> Self {
        Self::UnknownTeam { team: team.into() }
    }
}
