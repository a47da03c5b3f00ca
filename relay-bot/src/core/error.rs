//! Error types for the bot core.
//!
//! [`RelayError`] is the top-level error; [`HandlerError`] is used for
//! handler failures inside the chain.

use thiserror::Error;

/// Top-level error (database, bot transport, handler, config, IO).
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<storage::StorageError> for RelayError {
    fn from(e: storage::StorageError) -> Self {
        RelayError::Database(e.to_string())
    }
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("No text in message")]
    NoText,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("State error: {0}")]
    State(String),
}

/// Result type for core operations; uses [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;
