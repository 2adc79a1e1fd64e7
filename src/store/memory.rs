use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::job::JobRecord;

use super::{ResultStore, StoreError};

/// In-process store backed by a hash map. Records persist until the store
/// itself is dropped; nothing is ever deleted implicitly.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, JobRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn put(&self, key: &str, record: JobRecord) -> Result<(), StoreError> {
        self.records.write().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobKind, JobRecord};
    use crate::store::result_key;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let record = JobRecord::new(JobKind::Sleep, vec![5]);
        let key = result_key(&record.id);

        store.put(&key, record.clone()).await.unwrap();
        let loaded = store.get(&key).await.unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.state, record.state);
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("job-meta-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = MemoryStore::new();
        let a = JobRecord::new(JobKind::Sleep, vec![1]);
        let b = JobRecord::new(JobKind::Fibonacci, vec![2]);
        store.put(&result_key(&a.id), a).await.unwrap();
        store.put(&result_key(&b.id), b).await.unwrap();
        store
            .put("other-namespace-x", JobRecord::new(JobKind::Sleep, vec![3]))
            .await
            .unwrap();

        let records = store.list(crate::store::RESULT_KEY_PREFIX).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let store = MemoryStore::new();
        let mut record = JobRecord::new(JobKind::Sleep, vec![1]);
        let key = result_key(&record.id);
        store.put(&key, record.clone()).await.unwrap();

        record.start();
        store.put(&key, record).await.unwrap();

        let loaded = store.get(&key).await.unwrap().unwrap();
        assert_eq!(loaded.state, crate::job::JobState::Started);
    }
}
