//! Storage capabilities the client is built on.
//!
//! Writes report success as a `bool`: `Ok(false)` means the store refused
//! the write, while `Err` is a backend failure that passes through to the
//! caller untouched.

use crate::{error::Result, Operation, Record};
use async_trait::async_trait;

/// Durable storage for domain records, addressed by table and id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. `Ok(false)` if the id already exists.
    async fn insert<T: Record>(&self, table: &str, record: &T) -> Result<bool>;

    /// Replace an existing record. `Ok(false)` if it does not exist.
    async fn update<T: Record>(&self, table: &str, record: &T) -> Result<bool>;

    /// Remove a record. `Ok(false)` if it does not exist.
    async fn delete<T: Record>(&self, table: &str, record: &T) -> Result<bool>;

    async fn find_by_id<T: Record>(&self, table: &str, id: &str) -> Result<Option<T>>;

    async fn find_by<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync;

    async fn all<T: Record>(&self, table: &str) -> Result<Vec<T>>;
}

/// Durable, insertion-ordered storage for operations.
///
/// Calling `add_operations` or `delete_operations` with an empty slice is a
/// successful no-op.
#[async_trait]
pub trait OperationLog: Send + Sync {
    /// Append operations in order. An operation whose op id is already held
    /// is skipped, so a retried append never logs a mutation twice.
    async fn add_operations(&self, ops: &[Operation]) -> Result<bool>;

    /// Remove operations by op id, typically after the remote acknowledged them.
    async fn delete_operations(&self, ops: &[Operation]) -> Result<bool>;

    /// The first `limit` operations in insertion order, or all of them.
    async fn get_operations(&self, limit: Option<usize>) -> Result<Vec<Operation>>;

    /// Number of operations currently held.
    async fn len(&self) -> Result<usize> {
        Ok(self.get_operations(None).await?.len())
    }

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
