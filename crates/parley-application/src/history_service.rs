//! History browsing use case.

use chrono::{Local, TimeZone};
use parley_core::error::{ParleyError, Result};
use parley_core::history::{DayGroup, HistoryAggregator, HistoryRepository};
use parley_core::session::{SessionState, ThreadId};
use std::sync::Arc;

/// Reads one history store for display and thread restoration.
pub struct HistoryService {
    repository: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self { repository }
    }

    /// All records grouped by local day, most recent day first.
    pub async fn build(&self) -> Result<Vec<DayGroup>> {
        self.build_in(&Local).await
    }

    pub async fn build_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<Vec<DayGroup>> {
        let records = self.repository.list_all().await?;
        let groups = HistoryAggregator::build_in(&records, tz);
        tracing::debug!(
            "[HistoryService] Aggregated {} record(s) into {} day group(s)",
            records.len(),
            groups.len()
        );
        Ok(groups)
    }

    /// Restores a thread so the conversation can continue.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::NotFound` if no record belongs to `thread_id`.
    pub async fn open_thread(&self, thread_id: &ThreadId) -> Result<SessionState> {
        let records = self.repository.list_thread(thread_id).await?;
        if records.is_empty() {
            return Err(ParleyError::not_found("Thread", thread_id.as_str()));
        }
        tracing::info!(
            "[HistoryService] Restored thread {} with {} exchange(s)",
            thread_id,
            records.len()
        );
        Ok(SessionState::from_history(&records))
    }
}
