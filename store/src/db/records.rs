//! Record store backed by the records table.

use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use strand_engine::{Error, Record, RecordStore, Result};

/// [`RecordStore`] keeping each record as a JSON row keyed by table and id.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Count rows in `table`.
    pub async fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE table_name = ?")
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(count as usize)
    }

    async fn rows<T: Record>(&self, table: &str) -> Result<Vec<T>> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT data FROM records
            WHERE table_name = ?
            ORDER BY record_id ASC
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };
        let data = serde_json::to_string(record)?;

        let result = sqlx::query(
            r#"
            INSERT INTO records (table_name, record_id, data)
            VALUES (?, ?, ?)
            ON CONFLICT (table_name, record_id) DO NOTHING
            "#,
        )
        .bind(table)
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };
        let data = serde_json::to_string(record)?;

        let result =
            sqlx::query("UPDATE records SET data = ? WHERE table_name = ? AND record_id = ?")
                .bind(data)
                .bind(table)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(StoreError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM records WHERE table_name = ? AND record_id = ?")
            .bind(table)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id<T: Record>(&self, table: &str, id: &str) -> Result<Option<T>> {
        let data: Option<String> = sqlx::query_scalar(
            "SELECT data FROM records WHERE table_name = ? AND record_id = ?",
        )
        .bind(table)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn find_by<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let rows = self.rows::<T>(table).await?;
        Ok(rows.into_iter().filter(|r| predicate(r)).collect())
    }

    async fn all<T: Record>(&self, table: &str) -> Result<Vec<T>> {
        self.rows(table).await
    }
}
