//! Database connection pool management.

use crate::{config::Config, error::Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Type alias for the database pool.
pub type Pool = SqlitePool;

/// Create a new database connection pool.
///
/// In-memory databases live only as long as their connection, so those
/// pools keep exactly one connection open forever.
pub async fn create_pool(config: &Config) -> Result<Pool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    Ok(pool.connect_with(options).await?)
}

/// Run database migrations.
pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Connect and migrate in one step.
pub async fn connect(config: &Config) -> Result<Pool> {
    let pool = create_pool(config).await?;
    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;
    Ok(pool)
}
