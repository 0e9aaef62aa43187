//! Table registration.
//!
//! Every record type must be bound to a table before the client will touch
//! it. The registry is read-only once built and is shared freely across
//! concurrent calls.

use crate::{Record, TableName};
use std::collections::HashMap;

/// Resolves a record's logical type to its table.
pub trait TableRegistry: Send + Sync {
    /// Table name for `type_name`, or `None` when the type is unregistered.
    fn resolve(&self, type_name: &str) -> Option<&str>;
}

/// In-memory table registry keyed by [`Record::TYPE_NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    tables: HashMap<&'static str, TableName>,
}

impl Tables {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to `table`, replacing any earlier binding.
    pub fn register<T: Record>(&mut self, table: impl Into<TableName>) -> &mut Self {
        self.tables.insert(T::TYPE_NAME, table.into());
        self
    }

    /// Builder-style method to register a table.
    pub fn with_table<T: Record>(mut self, table: impl Into<TableName>) -> Self {
        self.register::<T>(table);
        self
    }

    /// Whether `T` has a table.
    pub fn contains<T: Record>(&self) -> bool {
        self.tables.contains_key(T::TYPE_NAME)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no type is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableRegistry for Tables {
    fn resolve(&self, type_name: &str) -> Option<&str> {
        self.tables.get(type_name).map(String::as_str)
    }
}
