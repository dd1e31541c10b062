use chrono::{TimeZone, Utc};
use parley_core::error::Result;
use parley_core::history::{HistoryAggregator, HistoryRecord, HistoryRepository};
use parley_core::session::{SessionState, ThreadId};
use std::sync::Mutex;

// Mock HistoryRepository for testing
struct MockHistoryRepository {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MockHistoryRepository {
    fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl HistoryRepository for MockHistoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[tokio::test]
async fn test_written_records_aggregate_latest_day_first() {
    let repo = MockHistoryRepository::new();
    let thread_a = ThreadId::from("threadA");
    let thread_b = ThreadId::from("threadB");
    let t1 = Utc.with_ymd_and_hms(2024, 12, 11, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 12, 11, 9, 5, 0).unwrap();
    let t3 = Utc.with_ymd_and_hms(2024, 12, 13, 14, 0, 0).unwrap();

    let r1 = HistoryRecord::new("q1", "a1", thread_a.clone(), t1);
    let r2 = HistoryRecord::new("q2", "a2", thread_a.clone(), t2);
    let r3 = HistoryRecord::new("q3", "a3", thread_b.clone(), t3);
    for record in [&r1, &r2, &r3] {
        repo.append(record).await.unwrap();
    }

    let records = repo.list_all().await.unwrap();
    let groups = HistoryAggregator::build_in(&records, &Utc);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, t3.date_naive());
    assert_eq!(groups[0].threads.len(), 1);
    assert_eq!(groups[0].threads[0].thread_id, thread_b);
    assert_eq!(groups[0].threads[0].records, vec![r3]);

    assert_eq!(groups[1].date, t1.date_naive());
    assert_eq!(groups[1].threads.len(), 1);
    assert_eq!(groups[1].threads[0].thread_id, thread_a);
    assert_eq!(groups[1].threads[0].records, vec![r1, r2]);

    // Unchanged input, unchanged output.
    let again = HistoryAggregator::build_in(&repo.list_all().await.unwrap(), &Utc);
    assert_eq!(groups, again);
}

#[tokio::test]
async fn test_list_thread_restores_session_in_order() {
    let repo = MockHistoryRepository::new();
    let thread = ThreadId::from("threadA");
    let early = Utc.with_ymd_and_hms(2024, 12, 11, 9, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 12, 12, 9, 0, 0).unwrap();

    repo.append(&HistoryRecord::new("second", "2", thread.clone(), late))
        .await
        .unwrap();
    repo.append(&HistoryRecord::new("other", "x", "threadB".into(), early))
        .await
        .unwrap();
    repo.append(&HistoryRecord::new("first", "1", thread.clone(), early))
        .await
        .unwrap();

    let records = repo.list_thread(&thread).await.unwrap();
    let session = SessionState::from_history(&records);

    let texts: Vec<_> = session.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "1", "second", "2"]);
    assert_eq!(session.thread_id(), &thread);
}
