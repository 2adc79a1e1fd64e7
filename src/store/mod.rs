//! Result store: the key-value backend holding job records.
//!
//! In deployment the store is a remote service, so the interface is async
//! and connection loss surfaces as the transient [`StoreError::Unavailable`]
//! rather than a panic. [`MemoryStore`] is the bundled implementation.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::job::JobRecord;

/// Keyspace under which job records are written.
pub const RESULT_KEY_PREFIX: &str = "job-meta-";

/// Store key for a job id.
pub fn result_key(id: &Uuid) -> String {
    format!("{}{}", RESULT_KEY_PREFIX, id)
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Transient connection loss to the backing store. Callers may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert or overwrite the record under `key`. Atomic per key; the write
    /// is visible to every subsequent `get`/`list`.
    async fn put(&self, key: &str, record: JobRecord) -> Result<(), StoreError>;

    /// Point lookup. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<JobRecord>, StoreError>;

    /// Every record whose key starts with `prefix`, in unspecified order.
    /// Sorting is the caller's responsibility.
    async fn list(&self, prefix: &str) -> Result<Vec<JobRecord>, StoreError>;
}
