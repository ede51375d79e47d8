//! In-process search index used when no remote index service is configured.

use crate::index::{
    IndexService,
    types::{IndexError, IndexableRecord},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Upsert-by-id record store guarded by an async lock.
#[derive(Default)]
pub struct InMemoryIndex {
    records: RwLock<HashMap<String, IndexableRecord>>,
}

impl InMemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the index holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Fetch a copy of the record stored under `id`.
    pub async fn get(&self, id: &str) -> Option<IndexableRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Sorted ids of every stored record.
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl IndexService for InMemoryIndex {
    async fn commit(&self, records: Vec<IndexableRecord>) -> Result<(), IndexError> {
        let mut guard = self.records.write().await;
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), IndexError> {
        let mut guard = self.records.write().await;
        for id in ids {
            guard.remove(id);
        }
        Ok(())
    }

    async fn delete_by_domains(&self, domains: &[String]) -> Result<(), IndexError> {
        self.records
            .write()
            .await
            .retain(|_, record| !domains.contains(&record.domain));
        Ok(())
    }
}
