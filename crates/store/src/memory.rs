//! The ReviewStore trait and its in-memory implementation.
//!
//! The recommendation engine never talks to a database directly; it is
//! handed a `ReviewStore` at construction time. That keeps the store a
//! swappable collaborator instead of a process-wide global client.

use crate::error::{Result, StoreError};
use crate::types::ReviewRecord;
use std::future::Future;
use std::sync::RwLock;

/// Read/append access to the durable review set.
///
/// `read_all` returns every stored record; the engine re-reads the full
/// set on each request and never caches across calls. `append` is the
/// review-submission write path and is never invoked by the engine.
pub trait ReviewStore {
    /// Fetch every stored review record.
    fn read_all(&self) -> impl Future<Output = Result<Vec<ReviewRecord>>> + Send;

    /// Append one review record. Records are immutable once written.
    fn append(&self, record: ReviewRecord) -> impl Future<Output = Result<()>> + Send;
}

/// In-memory store backed by a `RwLock<Vec<_>>`.
///
/// Used by the CLI (seeded from a JSON dataset) and by tests. Reads
/// clone the record set so callers own their snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ReviewRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with records.
    pub fn with_records(records: Vec<ReviewRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReviewStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<ReviewRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn append(&self, record: ReviewRecord) -> Result<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.push(record);
        Ok(())
    }
}
