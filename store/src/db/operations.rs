//! Operation log backed by the operations table.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use strand_engine::{
    AddOp, DeleteOp, ModifyOp, Operation, OperationKind, OperationLog, Result,
};

/// A stored operation row from the database.
#[derive(Debug)]
pub struct StoredOperation {
    pub seq: i64,
    pub op_id: String,
    pub table_name: String,
    pub record_id: String,
    pub op_type: String,
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for StoredOperation {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(StoredOperation {
            seq: row.try_get("seq")?,
            op_id: row.try_get("op_id")?,
            table_name: row.try_get("table_name")?,
            record_id: row.try_get("record_id")?,
            op_type: row.try_get("op_type")?,
            payload: row.try_get("payload")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}

impl StoredOperation {
    /// Convert database row to a strand-engine Operation.
    pub fn to_operation(&self) -> crate::error::Result<Operation> {
        let kind: OperationKind = self.op_type.parse().map_err(StoreError::Corrupt)?;

        let op = match kind {
            OperationKind::Add => Operation::Add(AddOp {
                op_id: self.op_id.clone(),
                table: self.table_name.clone(),
                record_id: self.record_id.clone(),
                data: serde_json::from_str(&self.payload)?,
                timestamp: self.timestamp,
            }),
            OperationKind::Modify => Operation::Modify(ModifyOp {
                op_id: self.op_id.clone(),
                table: self.table_name.clone(),
                record_id: self.record_id.clone(),
                changes: serde_json::from_str(&self.payload)?,
                timestamp: self.timestamp,
            }),
            OperationKind::Delete => Operation::Delete(DeleteOp {
                op_id: self.op_id.clone(),
                table: self.table_name.clone(),
                record_id: self.record_id.clone(),
                data: serde_json::from_str(&self.payload)?,
                timestamp: self.timestamp,
            }),
        };
        Ok(op)
    }
}

fn payload(op: &Operation) -> serde_json::Result<String> {
    match op {
        Operation::Add(a) => serde_json::to_string(&a.data),
        Operation::Modify(m) => serde_json::to_string(&m.changes),
        Operation::Delete(d) => serde_json::to_string(&d.data),
    }
}

/// [`OperationLog`] ordered by an autoincrement sequence.
#[derive(Debug, Clone)]
pub struct SqliteOperationLog {
    pool: SqlitePool,
}

impl SqliteOperationLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn insert_all(&self, ops: &[Operation]) -> crate::error::Result<()> {
        let mut tx = self.pool.begin().await?;
        for op in ops {
            // Re-adding an already logged op is a no-op.
            sqlx::query(
                r#"
                INSERT INTO operations (
                    op_id, table_name, record_id, op_type, payload, timestamp
                )
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (op_id) DO NOTHING
                "#,
            )
            .bind(op.op_id())
            .bind(op.table())
            .bind(op.record_id())
            .bind(op.kind().as_str())
            .bind(payload(op)?)
            .bind(op.timestamp())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_all(&self, ops: &[Operation]) -> crate::error::Result<()> {
        let mut tx = self.pool.begin().await?;
        for op in ops {
            sqlx::query("DELETE FROM operations WHERE op_id = ?")
                .bind(op.op_id())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fetch(&self, limit: Option<usize>) -> crate::error::Result<Vec<Operation>> {
        let rows = match limit {
            Some(limit) => {
                sqlx::query_as::<_, StoredOperation>(
                    r#"
                    SELECT seq, op_id, table_name, record_id, op_type, payload, timestamp
                    FROM operations
                    ORDER BY seq ASC
                    LIMIT ?
                    "#,
                )
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StoredOperation>(
                    r#"
                    SELECT seq, op_id, table_name, record_id, op_type, payload, timestamp
                    FROM operations
                    ORDER BY seq ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(StoredOperation::to_operation).collect()
    }
}

#[async_trait]
impl OperationLog for SqliteOperationLog {
    async fn add_operations(&self, ops: &[Operation]) -> Result<bool> {
        if ops.is_empty() {
            return Ok(true);
        }
        self.insert_all(ops).await?;
        tracing::debug!(count = ops.len(), "appended operations");
        Ok(true)
    }

    async fn delete_operations(&self, ops: &[Operation]) -> Result<bool> {
        if ops.is_empty() {
            return Ok(true);
        }
        self.remove_all(ops).await?;
        tracing::debug!(count = ops.len(), "deleted operations");
        Ok(true)
    }

    async fn get_operations(&self, limit: Option<usize>) -> Result<Vec<Operation>> {
        Ok(self.fetch(limit).await?)
    }

    async fn len(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(count as usize)
    }
}
