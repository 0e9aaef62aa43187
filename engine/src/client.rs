//! The client facade: the single entry point applications write through.
//!
//! A save decides insert vs. update by looking the record up, stamps audit
//! times, persists through the [`RecordStore`] and hands the committed
//! change to the [`ChangeTracker`]. Reads go straight to the store.

use crate::{
    clock::{Clock, SystemClock},
    error::{Error, Result, WriteAction},
    registry::{TableRegistry, Tables},
    store::{OperationLog, RecordStore},
    tracker::ChangeTracker,
    Record,
};
use std::sync::Arc;

/// Per-call write options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Stamp audit times and log an operation for this write.
    pub track_changes: bool,
}

impl WriteOptions {
    /// Write without stamping timestamps or logging an operation.
    pub const UNTRACKED: Self = Self {
        track_changes: false,
    };
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            track_changes: true,
        }
    }
}

/// Change-tracking facade over a record store and an operation log.
pub struct Client<S, L, R = Tables> {
    store: Arc<S>,
    tracker: ChangeTracker<L>,
    registry: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, L, R> Clone for Client<S, L, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tracker: self.tracker.clone(),
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, L, R> Client<S, L, R>
where
    S: RecordStore,
    L: OperationLog,
    R: TableRegistry,
{
    /// Create a client using the system clock.
    pub fn new(store: Arc<S>, log: Arc<L>, registry: R) -> Self {
        Self::with_clock(store, log, registry, Arc::new(SystemClock))
    }

    /// Create a client whose audit stamps and operation timestamps come from `clock`.
    pub fn with_clock(store: Arc<S>, log: Arc<L>, registry: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            tracker: ChangeTracker::with_clock(log, Arc::clone(&clock)),
            registry: Arc::new(registry),
            clock,
        }
    }

    /// The record store writes go to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The operation log the sync process drains.
    pub fn log(&self) -> &Arc<L> {
        self.tracker.log()
    }

    /// The tracker that logs committed writes.
    pub fn tracker(&self) -> &ChangeTracker<L> {
        &self.tracker
    }

    /// Insert or update `record` with change tracking on.
    ///
    /// A record with no id gets a fresh UUID and is inserted. A record whose
    /// id is already stored is updated; otherwise it is inserted under that id.
    pub async fn save<T: Record>(&self, record: &mut T) -> Result<()> {
        self.save_with(record, WriteOptions::default()).await
    }

    /// Insert or update `record`, tracking only if `options` says so.
    pub async fn save_with<T: Record>(&self, record: &mut T, options: WriteOptions) -> Result<()> {
        let table = self.table_for::<T>()?;

        let existing = match record.key() {
            Some(id) => self.store.find_by_id::<T>(table, id).await?,
            None => {
                record.set_id(uuid::Uuid::new_v4().to_string());
                None
            }
        };

        match existing {
            None => self.insert(table, record, options).await,
            Some(previous) => self.update(table, &previous, record, options).await,
        }
    }

    async fn insert<T: Record>(
        &self,
        table: &str,
        record: &mut T,
        options: WriteOptions,
    ) -> Result<()> {
        if options.track_changes {
            let now = self.clock.now();
            record.set_created_at(now);
            record.set_updated_at(now);
        }

        if !self.store.insert(table, &*record).await? {
            tracing::warn!(table, record_id = ?record.key(), "record store rejected insert");
            return Err(Error::StoreOperation(WriteAction::Insert));
        }
        tracing::debug!(table, record_id = ?record.key(), "inserted record");

        if options.track_changes {
            self.tracker.on_add(table, &*record).await?;
        }
        Ok(())
    }

    async fn update<T: Record>(
        &self,
        table: &str,
        previous: &T,
        record: &mut T,
        options: WriteOptions,
    ) -> Result<()> {
        if options.track_changes {
            record.set_updated_at(self.clock.now());
        }

        if !self.store.update(table, &*record).await? {
            tracing::warn!(table, record_id = ?record.key(), "record store rejected update");
            return Err(Error::StoreOperation(WriteAction::Update));
        }
        tracing::debug!(table, record_id = ?record.key(), "updated record");

        if options.track_changes {
            self.tracker.on_modify(table, previous, &*record).await?;
        }
        Ok(())
    }

    /// Delete `record` with change tracking on.
    pub async fn delete<T: Record>(&self, record: &T) -> Result<()> {
        self.delete_with(record, WriteOptions::default()).await
    }

    /// Delete `record`, tracking only if `options` says so.
    pub async fn delete_with<T: Record>(&self, record: &T, options: WriteOptions) -> Result<()> {
        let table = self.table_for::<T>()?;
        if record.key().is_none() {
            return Err(Error::MissingId);
        }

        if !self.store.delete(table, record).await? {
            tracing::warn!(table, record_id = ?record.key(), "record store rejected delete");
            return Err(Error::StoreOperation(WriteAction::Delete));
        }
        tracing::debug!(table, record_id = ?record.key(), "deleted record");

        if options.track_changes {
            self.tracker.on_delete(table, record).await?;
        }
        Ok(())
    }

    /// All records of type `T` matching `predicate`.
    pub async fn find_by<T, P>(&self, predicate: P) -> Result<Vec<T>>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let table = self.table_for::<T>()?;
        self.store.find_by(table, predicate).await
    }

    /// Every record of type `T`.
    pub async fn get_all<T: Record>(&self) -> Result<Vec<T>> {
        let table = self.table_for::<T>()?;
        self.store.all(table).await
    }

    /// The record of type `T` stored under `id`, if any.
    pub async fn get_by_id<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let table = self.table_for::<T>()?;
        self.store.find_by_id(table, id).await
    }

    fn table_for<T: Record>(&self) -> Result<&str> {
        self.registry
            .resolve(T::TYPE_NAME)
            .ok_or_else(|| Error::TableNotRegistered(T::TYPE_NAME.to_string()))
    }
}
