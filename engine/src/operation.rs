//! Operation types recorded in the operation log.
//!
//! Every tracked mutation becomes exactly one operation. Operations are
//! immutable once built and are consumed front-to-back by the sync process.

use crate::{RecordId, TableName, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unique identifier for an operation.
pub type OperationId = String;

/// What kind of mutation an operation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Modify,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Modify => "modify",
            OperationKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(OperationKind::Add),
            "modify" => Ok(OperationKind::Modify),
            "delete" => Ok(OperationKind::Delete),
            other => Err(format!("unknown operation kind: {other}")),
        }
    }
}

/// Prior and new value of a single field.
///
/// A field absent on one side is recorded as `null` on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// A record was inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOp {
    /// Operation ID
    pub op_id: OperationId,
    /// Table the record lives in
    pub table: TableName,
    /// Inserted record ID
    pub record_id: RecordId,
    /// Full state of the new record
    pub data: Value,
    /// When the operation was recorded
    pub timestamp: Timestamp,
}

/// A record was updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOp {
    /// Operation ID
    pub op_id: OperationId,
    /// Table the record lives in
    pub table: TableName,
    /// Updated record ID
    pub record_id: RecordId,
    /// Changed top-level fields only
    pub changes: BTreeMap<String, FieldChange>,
    /// When the operation was recorded
    pub timestamp: Timestamp,
}

/// A record was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOp {
    /// Operation ID
    pub op_id: OperationId,
    /// Table the record lived in
    pub table: TableName,
    /// Deleted record ID
    pub record_id: RecordId,
    /// Last known state of the record
    pub data: Value,
    /// When the operation was recorded
    pub timestamp: Timestamp,
}

/// One logical mutation, ready to be shipped to a remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    Add(AddOp),
    Modify(ModifyOp),
    Delete(DeleteOp),
}

impl Operation {
    /// Get the operation ID.
    pub fn op_id(&self) -> &OperationId {
        match self {
            Operation::Add(op) => &op.op_id,
            Operation::Modify(op) => &op.op_id,
            Operation::Delete(op) => &op.op_id,
        }
    }

    /// Get the record ID this operation targets.
    pub fn record_id(&self) -> &RecordId {
        match self {
            Operation::Add(op) => &op.record_id,
            Operation::Modify(op) => &op.record_id,
            Operation::Delete(op) => &op.record_id,
        }
    }

    /// Get the table this operation targets.
    pub fn table(&self) -> &TableName {
        match self {
            Operation::Add(op) => &op.table,
            Operation::Modify(op) => &op.table,
            Operation::Delete(op) => &op.table,
        }
    }

    /// Get the timestamp of this operation.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Operation::Add(op) => op.timestamp,
            Operation::Modify(op) => op.timestamp,
            Operation::Delete(op) => op.timestamp,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Add(_) => OperationKind::Add,
            Operation::Modify(_) => OperationKind::Modify,
            Operation::Delete(_) => OperationKind::Delete,
        }
    }
}

impl AddOp {
    /// Create a new add operation with a fresh ID.
    pub fn new(
        table: impl Into<TableName>,
        record_id: impl Into<RecordId>,
        data: Value,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            op_id: new_op_id(),
            table: table.into(),
            record_id: record_id.into(),
            data,
            timestamp,
        }
    }
}

impl ModifyOp {
    /// Create a new modify operation with a fresh ID.
    pub fn new(
        table: impl Into<TableName>,
        record_id: impl Into<RecordId>,
        changes: BTreeMap<String, FieldChange>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            op_id: new_op_id(),
            table: table.into(),
            record_id: record_id.into(),
            changes,
            timestamp,
        }
    }
}

impl DeleteOp {
    /// Create a new delete operation with a fresh ID.
    pub fn new(
        table: impl Into<TableName>,
        record_id: impl Into<RecordId>,
        data: Value,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            op_id: new_op_id(),
            table: table.into(),
            record_id: record_id.into(),
            data,
            timestamp,
        }
    }
}

fn new_op_id() -> OperationId {
    uuid::Uuid::new_v4().to_string()
}

/// Diff two JSON objects field by field.
///
/// Only top-level fields are compared. Non-object values are treated as
/// objects with no fields.
pub fn diff_fields(old: &Value, new: &Value) -> BTreeMap<String, FieldChange> {
    let empty = serde_json::Map::new();
    let old = old.as_object().unwrap_or(&empty);
    let new = new.as_object().unwrap_or(&empty);

    let mut changes = BTreeMap::new();
    for key in old.keys().chain(new.keys()) {
        if changes.contains_key(key) {
            continue;
        }
        let before = old.get(key).cloned().unwrap_or(Value::Null);
        let after = new.get(key).cloned().unwrap_or(Value::Null);
        if before != after {
            changes.insert(
                key.clone(),
                FieldChange {
                    old: before,
                    new: after,
                },
            );
        }
    }
    changes
}
