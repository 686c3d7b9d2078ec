use thiserror::Error;

/// Errors produced when parsing a colour from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("expected 6 hex digits, got {0:?}")]
    InvalidLength(String),

    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

/// Errors produced while loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
