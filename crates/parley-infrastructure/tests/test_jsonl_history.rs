use chrono::{Duration, TimeZone, Utc};
use parley_core::history::{HistoryAggregator, HistoryKind, HistoryRecord, HistoryRepository};
use parley_core::session::ThreadId;
use parley_infrastructure::{JsonlHistoryRepository, ParleyPaths};
use std::sync::Arc;
use tempfile::TempDir;

fn record(question: &str, thread: &str, minutes: i64) -> HistoryRecord {
    let base = Utc.with_ymd_and_hms(2024, 12, 11, 9, 0, 0).unwrap();
    HistoryRecord::new(
        question,
        format!("answer to {}", question),
        ThreadId::from(thread),
        base + Duration::minutes(minutes),
    )
}

#[tokio::test]
async fn test_list_all_on_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonlHistoryRepository::new(temp_dir.path().join("history").join("online.jsonl"));

    let records = repo.list_all().await.expect("Should read empty history");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_records_survive_reopen_in_write_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history").join("online.jsonl");

    {
        let repo = JsonlHistoryRepository::new(&path);
        repo.append(&record("q1", "threadA", 0)).await.unwrap();
        repo.append(&record("q2", "threadA", 5)).await.unwrap();
    }

    let reopened = JsonlHistoryRepository::new(&path);
    reopened.append(&record("q3", "threadB", 10)).await.unwrap();

    let questions: Vec<_> = reopened
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.question)
        .collect();
    assert_eq!(questions, vec!["q1", "q2", "q3"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_are_never_torn() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("online.jsonl");
    let writer = Arc::new(JsonlHistoryRepository::new(&path));
    // A second handle on the same file, as another window would have.
    let other_writer = Arc::new(JsonlHistoryRepository::new(&path));

    let mut handles = Vec::new();
    for i in 0..40 {
        let repo = if i % 2 == 0 {
            writer.clone()
        } else {
            other_writer.clone()
        };
        handles.push(tokio::spawn(async move {
            let long_answer = "x".repeat(4096);
            let mut r = record(&format!("q{}", i), &format!("thread{}", i % 5), i);
            r.answer = long_answer;
            repo.append(&r).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = writer.list_all().await.unwrap();
    assert_eq!(records.len(), 40);
    assert!(records.iter().all(|r| r.answer.len() == 4096));
}

#[tokio::test]
async fn test_online_and_offline_histories_are_separate() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ParleyPaths::new(Some(temp_dir.path()));
    let online = JsonlHistoryRepository::in_paths(&paths, HistoryKind::Online).unwrap();
    let offline = JsonlHistoryRepository::in_paths(&paths, HistoryKind::Offline).unwrap();

    online.append(&record("remote", "threadA", 0)).await.unwrap();
    offline.append(&record("local", "threadB", 0)).await.unwrap();

    assert_eq!(online.list_all().await.unwrap()[0].question, "remote");
    assert_eq!(offline.list_all().await.unwrap()[0].question, "local");
    assert_ne!(online.path(), offline.path());
}

#[tokio::test]
async fn test_persisted_records_aggregate() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonlHistoryRepository::new(temp_dir.path().join("online.jsonl"));

    repo.append(&record("q1", "threadA", 0)).await.unwrap();
    repo.append(&record("q2", "threadA", 1)).await.unwrap();
    repo.append(&record("q3", "threadB", 60 * 24)).await.unwrap();

    let groups = HistoryAggregator::build_in(&repo.list_all().await.unwrap(), &Utc);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].threads[0].thread_id.as_str(), "threadB");
    assert_eq!(groups[1].threads[0].records.len(), 2);
}
