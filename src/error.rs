//! Error types for Svar.

use thiserror::Error;

/// Library-level error type for Svar operations.
#[derive(Error, Debug)]
pub enum SvarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Records service error: {0}")]
    Records(String),

    #[error("Slack API error: {0}")]
    Slack(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Svar operations.
pub type Result<T> = std::result::Result<T, SvarError>;
