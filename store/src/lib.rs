//! # Strand Store
//!
//! SQLite persistence for the strand engine: a [`SqliteRecordStore`] and a
//! [`SqliteOperationLog`] sharing one connection pool.
//!
//! ```no_run
//! use std::sync::Arc;
//! use strand_engine::{Client, Tables};
//! use strand_store::{Config, Database};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! strand_store::init_tracing();
//! let db = Database::connect(&Config::load()?).await?;
//! let client = Client::new(Arc::new(db.records()), Arc::new(db.operations()), Tables::new());
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use db::{SqliteOperationLog, SqliteRecordStore, StoredOperation};
pub use error::StoreError;
pub use telemetry::init_tracing;

/// A migrated SQLite database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: db::Pool,
}

impl Database {
    /// Open the configured database and apply pending migrations.
    pub async fn connect(config: &Config) -> error::Result<Self> {
        tracing::info!("Opening SQLite database at {}", config.database_url);
        let pool = db::connect(config).await?;
        Ok(Self { pool })
    }

    /// A fresh, migrated in-memory database.
    pub async fn in_memory() -> error::Result<Self> {
        Self::connect(&Config::in_memory()).await
    }

    pub fn pool(&self) -> &db::Pool {
        &self.pool
    }

    pub fn records(&self) -> SqliteRecordStore {
        SqliteRecordStore::new(self.pool.clone())
    }

    pub fn operations(&self) -> SqliteOperationLog {
        SqliteOperationLog::new(self.pool.clone())
    }
}
