//! # Strand Engine
//!
//! The write path of an offline-first data client.
//!
//! Every insert, update and delete made through the [`Client`] is captured,
//! exactly once, as an ordered [`Operation`] in an [`OperationLog`]. A
//! separate sync process drains that log front-to-back and deletes entries
//! once the remote has acknowledged them.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! Any type implementing [`Record`] can be saved. The client owns three of
//! its fields:
//! - `id`, assigned on first save when empty
//! - `created_at`, stamped once on insert
//! - `updated_at`, stamped on every tracked write
//!
//! Each record type must be bound to a table in a [`TableRegistry`] before
//! use; [`Tables`] is the default registry.
//!
//! ### Operations
//!
//! - [`AddOp`] - a record was inserted, carries its full state
//! - [`ModifyOp`] - a record was updated, carries old and new values of changed fields
//! - [`DeleteOp`] - a record was removed, carries its last state
//!
//! ### Capabilities
//!
//! Persistence is pluggable through [`RecordStore`] and [`OperationLog`].
//! [`MemoryRecordStore`] and [`MemoryOperationLog`] ship with the engine;
//! the `strand-store` crate provides SQLite-backed ones.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde::{Deserialize, Serialize};
//! use strand_engine::{
//!     Client, MemoryOperationLog, MemoryRecordStore, OperationKind, OperationLog, Record,
//!     RecordId, Tables, Timestamp,
//! };
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Todo {
//!     id: Option<String>,
//!     title: String,
//!     created_at: Option<Timestamp>,
//!     updated_at: Option<Timestamp>,
//! }
//!
//! impl Record for Todo {
//!     const TYPE_NAME: &'static str = "Todo";
//!
//!     fn id(&self) -> Option<&str> { self.id.as_deref() }
//!     fn set_id(&mut self, id: RecordId) { self.id = Some(id); }
//!     fn created_at(&self) -> Option<Timestamp> { self.created_at }
//!     fn set_created_at(&mut self, at: Timestamp) { self.created_at = Some(at); }
//!     fn updated_at(&self) -> Option<Timestamp> { self.updated_at }
//!     fn set_updated_at(&mut self, at: Timestamp) { self.updated_at = Some(at); }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> strand_engine::Result<()> {
//! let client = Client::new(
//!     Arc::new(MemoryRecordStore::new()),
//!     Arc::new(MemoryOperationLog::new()),
//!     Tables::new().with_table::<Todo>("todos"),
//! );
//!
//! let mut todo = Todo { title: "Buy milk".into(), ..Default::default() };
//! client.save(&mut todo).await?;
//! assert!(todo.id.is_some());
//!
//! let ops = client.log().get_operations(None).await?;
//! assert_eq!(ops.len(), 1);
//! assert_eq!(ops[0].kind(), OperationKind::Add);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clock;
pub mod error;
pub mod memory;
pub mod operation;
pub mod record;
pub mod registry;
pub mod store;
pub mod tracker;

// Re-export main types at crate root
pub use client::{Client, WriteOptions};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result, WriteAction};
pub use memory::{MemoryOperationLog, MemoryRecordStore};
pub use operation::{
    diff_fields, AddOp, DeleteOp, FieldChange, ModifyOp, Operation, OperationId, OperationKind,
};
pub use record::Record;
pub use registry::{TableRegistry, Tables};
pub use store::{OperationLog, RecordStore};
pub use tracker::ChangeTracker;

/// Type aliases for clarity
pub type RecordId = String;
pub type TableName = String;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
