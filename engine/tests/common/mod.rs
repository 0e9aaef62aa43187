//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use strand_engine::{
    Client, Error, ManualClock, MemoryOperationLog, MemoryRecordStore, Operation, OperationLog,
    Record, RecordId, RecordStore, Result, Tables, Timestamp,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Option<String>,
    pub title: String,
    pub done: bool,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Todo {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Record for Todo {
    const TYPE_NAME: &'static str = "Todo";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
    fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = Some(at);
    }
    fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }
    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = Some(at);
    }
}

/// A record type nobody registers a table for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Orphan {
    pub id: Option<String>,
}

impl Record for Orphan {
    const TYPE_NAME: &'static str = "Orphan";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
    fn created_at(&self) -> Option<Timestamp> {
        None
    }
    fn set_created_at(&mut self, _: Timestamp) {}
    fn updated_at(&self) -> Option<Timestamp> {
        None
    }
    fn set_updated_at(&mut self, _: Timestamp) {}
}

/// Wraps [`MemoryRecordStore`], counting calls and optionally refusing writes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryRecordStore,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub reads: AtomicUsize,
    pub refuse_writes: AtomicBool,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.reads.load(Ordering::SeqCst)
    }

    pub fn refuse_writes(&self) {
        self.refuse_writes.store(true, Ordering::SeqCst);
    }

    fn refusing(&self) -> bool {
        self.refuse_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn insert<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.refusing() {
            return Ok(false);
        }
        self.inner.insert(table, record).await
    }

    async fn update<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.refusing() {
            return Ok(false);
        }
        self.inner.update(table, record).await
    }

    async fn delete<T: Record>(&self, table: &str, record: &T) -> Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.refusing() {
            return Ok(false);
        }
        self.inner.delete(table, record).await
    }

    async fn find_by_id<T: Record>(&self, table: &str, id: &str) -> Result<Option<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(table, id).await
    }

    async fn find_by<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by(table, predicate).await
    }

    async fn all<T: Record>(&self, table: &str) -> Result<Vec<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.all(table).await
    }
}

/// An operation log whose writes can be switched to refuse or fail.
#[derive(Debug, Default)]
pub struct FlakyLog {
    inner: MemoryOperationLog,
    pub refuse: AtomicBool,
    pub fail: AtomicBool,
}

#[async_trait]
impl OperationLog for FlakyLog {
    async fn add_operations(&self, ops: &[Operation]) -> Result<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Backend("log offline".into()));
        }
        if self.refuse.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.add_operations(ops).await
    }

    async fn delete_operations(&self, ops: &[Operation]) -> Result<bool> {
        self.inner.delete_operations(ops).await
    }

    async fn get_operations(&self, limit: Option<usize>) -> Result<Vec<Operation>> {
        self.inner.get_operations(limit).await
    }
}

pub fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()
}

pub fn tables() -> Tables {
    Tables::new().with_table::<Todo>("todos")
}

pub type TestClient = Client<CountingStore, MemoryOperationLog>;

pub fn client() -> (TestClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let client = Client::with_clock(
        Arc::new(CountingStore::default()),
        Arc::new(MemoryOperationLog::new()),
        tables(),
        clock.clone(),
    );
    (client, clock)
}
