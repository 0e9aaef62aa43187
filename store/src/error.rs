//! Unified error handling for the SQLite store.

use crate::config::ConfigError;

/// Store error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt operation row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<StoreError> for strand_engine::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Json(e) => strand_engine::Error::Serialization(e.to_string()),
            other => {
                tracing::error!("store error: {:?}", other);
                strand_engine::Error::Backend(other.to_string())
            }
        }
    }
}

/// Result type alias for store functions.
pub type Result<T> = std::result::Result<T, StoreError>;
