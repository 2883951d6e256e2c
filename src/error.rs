// Error types for mealbook.
// Covers transport, HTTP status, authentication, translation and storage failures.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealbookError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl MealbookError {
    /// HTTP status carried by this error, if it came from a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MealbookError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MealbookError>;
