//! Error types for the onboarding components.

/// Message shown in the description field when a fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch meta description";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch meta description: {reason}")]
    FetchFailed { reason: String },

    #[error("Failed to scan {url}: {reason}")]
    ScanFailed { url: String, reason: String },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("A completed page must carry at least one chunk")]
    EmptyChunks,

    #[error("Base URL must not be empty")]
    EmptyBaseUrl,

    #[error("Cannot leave step {step}: {reason}")]
    StepBlocked { step: String, reason: String },

    #[error("Scan run {run_id} was superseded by a newer run")]
    Superseded { run_id: u64 },

    #[error("Task was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
