//! Error types for the strand engine.

use thiserror::Error;

/// The kind of record-store write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for WriteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteAction::Insert => write!(f, "insert"),
            WriteAction::Update => write!(f, "update"),
            WriteAction::Delete => write!(f, "delete"),
        }
    }
}

/// All possible errors from the strand engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Configuration errors
    #[error("table not registered for type: {0}")]
    TableNotRegistered(String),

    // Precondition errors
    #[error("cannot delete item without id")]
    MissingId,

    // Store errors
    #[error("could not {0} item")]
    StoreOperation(WriteAction),

    #[error("could not track change: {0}")]
    Tracking(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
