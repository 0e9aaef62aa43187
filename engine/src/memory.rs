//! In-memory implementations of the storage capabilities.
//!
//! Both are safe to share behind an `Arc` across tasks.

use crate::{
    error::{Error, Result},
    store::{OperationLog, RecordStore},
    Operation, OperationId, Record, RecordId, TableName,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;

/// Records held as JSON, one ordered map per table.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: DashMap<TableName, BTreeMap<RecordId, Value>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `table`.
    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.len()).unwrap_or(0)
    }

    fn rows<T: Record>(&self, table: &str) -> Result<Vec<T>> {
        let Some(rows) = self.tables.get(table) else {
            return Ok(Vec::new());
        };
        rows.values()
            .map(|v| serde_json::from_value(v.clone()).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };
        let value = serde_json::to_value(record)?;
        let mut rows = self.tables.entry(table.to_string()).or_default();
        if rows.contains_key(id) {
            return Ok(false);
        }
        rows.insert(id.to_string(), value);
        Ok(true)
    }

    async fn update<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };
        let value = serde_json::to_value(record)?;
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(false);
        };
        match rows.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        let Some(id) = record.key() else {
            return Ok(false);
        };
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(false);
        };
        Ok(rows.remove(id).is_some())
    }

    async fn find_by_id<T: Record>(&self, table: &str, id: &str) -> Result<Option<T>> {
        let value = self
            .tables
            .get(table)
            .and_then(|rows| rows.get(id).cloned());
        match value {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    async fn find_by<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        Ok(self
            .rows::<T>(table)?
            .into_iter()
            .filter(|r| predicate(r))
            .collect())
    }

    async fn all<T: Record>(&self, table: &str) -> Result<Vec<T>> {
        self.rows(table)
    }
}

/// Operations held in insertion order.
#[derive(Debug, Default)]
pub struct MemoryOperationLog {
    ops: Mutex<Vec<Operation>>,
}

impl MemoryOperationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OperationLog for MemoryOperationLog {
    async fn add_operations(&self, ops: &[Operation]) -> Result<bool> {
        if ops.is_empty() {
            return Ok(true);
        }
        let mut held = self.ops.lock().await;
        let mut ids: HashSet<OperationId> = held.iter().map(|op| op.op_id().clone()).collect();
        for op in ops {
            if ids.insert(op.op_id().clone()) {
                held.push(op.clone());
            }
        }
        Ok(true)
    }

    async fn delete_operations(&self, ops: &[Operation]) -> Result<bool> {
        if ops.is_empty() {
            return Ok(true);
        }
        let ids: HashSet<&str> = ops.iter().map(|op| op.op_id().as_str()).collect();
        self.ops
            .lock()
            .await
            .retain(|op| !ids.contains(op.op_id().as_str()));
        Ok(true)
    }

    async fn get_operations(&self, limit: Option<usize>) -> Result<Vec<Operation>> {
        let ops = self.ops.lock().await;
        let take = limit.unwrap_or(ops.len());
        Ok(ops.iter().take(take).cloned().collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.ops.lock().await.len())
    }
}
