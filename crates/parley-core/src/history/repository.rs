//! History repository trait.

use async_trait::async_trait;

use super::HistoryRecord;
use crate::error::Result;
use crate::session::ThreadId;

/// Durable, append-only storage for answered exchanges.
///
/// Implementations must make each `append` atomic with respect to
/// `list_all`: a reader sees a record completely or not at all. There is no
/// update or delete.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Persistence` if the record could not be written.
    async fn append(&self, record: &HistoryRecord) -> Result<()>;

    /// Returns every stored record in storage order.
    async fn list_all(&self) -> Result<Vec<HistoryRecord>>;

    /// Returns one thread's records, oldest first.
    async fn list_thread(&self, thread_id: &ThreadId) -> Result<Vec<HistoryRecord>> {
        let mut records: Vec<HistoryRecord> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|record| &record.thread_id == thread_id)
            .collect();
        records.sort_by_key(|record| record.date);
        Ok(records)
    }
}
