//! The record capability every tracked entity type implements.

use crate::{RecordId, Timestamp};
use serde::{de::DeserializeOwned, Serialize};

/// A domain entity persisted through the [`Client`](crate::Client).
///
/// The client owns identity and audit stamps: it assigns `id` on first save
/// and maintains `created_at` / `updated_at` while change tracking is on.
/// Everything else about the type is opaque; records travel through stores
/// and the operation log as JSON.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Logical type name, used for table registration lookup.
    const TYPE_NAME: &'static str;

    /// Raw identifier. `None` or an empty string means the record is new.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: RecordId);

    fn created_at(&self) -> Option<Timestamp>;

    fn set_created_at(&mut self, at: Timestamp);

    fn updated_at(&self) -> Option<Timestamp>;

    fn set_updated_at(&mut self, at: Timestamp);

    /// The identifier, only when present and non-empty.
    fn key(&self) -> Option<&str> {
        self.id().filter(|id| !id.is_empty())
    }
}
