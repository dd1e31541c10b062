//! In-process `HistoryRepository` for ephemeral sessions and tests.

use async_trait::async_trait;
use parley_core::error::Result;
use parley_core::history::{HistoryRecord, HistoryRepository};
use tokio::sync::RwLock;

/// History kept in memory only; lost when dropped.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.records.read().await.clone())
    }
}
