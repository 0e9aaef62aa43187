//! Change tracking: turns committed mutations into logged operations.

use crate::{
    clock::{Clock, SystemClock},
    error::{Error, Result},
    operation::diff_fields,
    store::OperationLog,
    AddOp, DeleteOp, ModifyOp, Operation, Record,
};
use std::sync::Arc;

/// Records one operation per committed mutation.
///
/// The record write has already happened by the time a notification
/// arrives, so a failure to persist the operation is returned to the
/// caller rather than dropped.
pub struct ChangeTracker<L> {
    log: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> Clone for ChangeTracker<L> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<L: OperationLog> ChangeTracker<L> {
    /// Create a tracker writing to `log`, timestamped by the system clock.
    pub fn new(log: Arc<L>) -> Self {
        Self::with_clock(log, Arc::new(SystemClock))
    }

    /// Create a tracker timestamping operations with `clock`.
    pub fn with_clock(log: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// The underlying operation log.
    pub fn log(&self) -> &Arc<L> {
        &self.log
    }

    /// A record was inserted into `table`.
    pub async fn on_add<T: Record>(&self, table: &str, record: &T) -> Result<Operation> {
        let op = AddOp::new(
            table,
            record_id(record)?,
            serde_json::to_value(record)?,
            self.clock.now(),
        );
        self.persist(Operation::Add(op)).await
    }

    /// A record in `table` moved from `previous` to `current`.
    pub async fn on_modify<T: Record>(
        &self,
        table: &str,
        previous: &T,
        current: &T,
    ) -> Result<Operation> {
        let id = record_id(current)?;
        let changes = diff_fields(
            &serde_json::to_value(previous)?,
            &serde_json::to_value(current)?,
        );
        let op = ModifyOp::new(table, id, changes, self.clock.now());
        self.persist(Operation::Modify(op)).await
    }

    /// A record was removed from `table`.
    pub async fn on_delete<T: Record>(&self, table: &str, record: &T) -> Result<Operation> {
        let op = DeleteOp::new(
            table,
            record_id(record)?,
            serde_json::to_value(record)?,
            self.clock.now(),
        );
        self.persist(Operation::Delete(op)).await
    }

    async fn persist(&self, op: Operation) -> Result<Operation> {
        if !self.log.add_operations(std::slice::from_ref(&op)).await? {
            tracing::warn!(
                table = %op.table(),
                record_id = %op.record_id(),
                kind = %op.kind(),
                "operation log rejected operation"
            );
            return Err(Error::Tracking(format!(
                "operation log rejected {} of {}/{}",
                op.kind(),
                op.table(),
                op.record_id()
            )));
        }

        tracing::debug!(
            op_id = %op.op_id(),
            table = %op.table(),
            record_id = %op.record_id(),
            kind = %op.kind(),
            "tracked operation"
        );
        Ok(op)
    }
}

fn record_id<T: Record>(record: &T) -> Result<String> {
    record.key().map(str::to_string).ok_or(Error::MissingId)
}
