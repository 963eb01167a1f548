//! In-memory archival backend — best-effort and not durable.

use async_trait::async_trait;
use chrono::Utc;
use mnemos_core::error::MemoryError;
use mnemos_core::memory::{ArchivalMemory, ArchivalRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::vector::vector_search;

/// An archival store that keeps embedded records in a Vec.
/// Records are only ever appended.
pub struct InMemoryArchive {
    records: Arc<RwLock<Vec<ArchivalRecord>>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchivalMemory for InMemoryArchive {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn insert(&self, content: String, embedding: Vec<f32>) -> Result<String, MemoryError> {
        if embedding.is_empty() {
            return Err(MemoryError::Storage(
                "refusing to store a record without an embedding".into(),
            ));
        }
        let id = Uuid::new_v4().to_string();
        self.records.write().await.push(ArchivalRecord {
            id: id.clone(),
            content,
            created_at: Utc::now(),
            score: 0.0,
            embedding,
        });
        Ok(id)
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ArchivalRecord>, MemoryError> {
        let records = self.records.read().await;
        Ok(vector_search(&records, query_embedding, limit))
    }

    async fn count(&self) -> Result<usize, MemoryError> {
        Ok(self.records.read().await.len())
    }
}
