//! JSON Lines implementation of `HistoryRepository`.
//!
//! File layout: one `HistoryRecord` per line, appended in write order.
//!
//! ```text
//! {"question":"...","answer":"...","threadId":"20241211-093005.123-1a2b3c4d","date":"2024-12-11T09:30:41Z"}
//! {"question":"...","answer":"...","threadId":"20241211-093005.123-1a2b3c4d","date":"2024-12-11T09:31:02Z"}
//! ```
//!
//! Appends hold an exclusive advisory lock and write the whole line with a
//! single `write_all` followed by `sync_data`; reads hold a shared lock.
//! A trailing line without its newline (left by a crash mid-write) is
//! ignored, so readers never see a partial record.

use async_trait::async_trait;
use parley_core::error::{ParleyError, Result};
use parley_core::history::{HistoryKind, HistoryRecord, HistoryRepository};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::paths::ParleyPaths;
use crate::storage::LockedFile;

/// Append-only history store backed by a `.jsonl` file.
pub struct JsonlHistoryRepository {
    path: PathBuf,
    /// Keeps appends from this process in call order.
    write_lock: Mutex<()>,
}

impl JsonlHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store for `kind` under the standard data directory.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if the data directory cannot be determined.
    pub fn default_location(kind: HistoryKind) -> Result<Self> {
        Self::in_paths(&ParleyPaths::default(), kind)
    }

    pub fn in_paths(paths: &ParleyPaths, kind: HistoryKind) -> Result<Self> {
        let path = paths
            .history_file(kind)
            .map_err(|e| ParleyError::config(format!("Failed to resolve history path: {}", e)))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryRepository for JsonlHistoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_line(&path, &line))
            .await
            .map_err(|e| ParleyError::persistence(format!("History writer task failed: {}", e)))?
            .map_err(|e| {
                ParleyError::persistence(format!(
                    "Failed to append history record to {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        tracing::debug!(
            "[JsonlHistoryRepository] Appended record for thread {}",
            record.thread_id
        );
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        let path = self.path.clone();
        let content = tokio::task::spawn_blocking(move || read_content(&path))
            .await
            .map_err(|e| ParleyError::persistence(format!("History reader task failed: {}", e)))?
            .map_err(|e| {
                ParleyError::persistence(format!(
                    "Failed to read history from {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        Ok(parse_records(&content))
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _lock = LockedFile::exclusive(&file)?;
    (&file).write_all(line.as_bytes())?;
    file.sync_data()
}

fn read_content(path: &Path) -> std::io::Result<String> {
    let file = match OpenOptions::new().read(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(e),
    };
    let _lock = LockedFile::shared(&file)?;
    let mut content = String::new();
    (&file).read_to_string(&mut content)?;
    Ok(content)
}

fn parse_records(content: &str) -> Vec<HistoryRecord> {
    let complete = match content.rfind('\n') {
        Some(end) => &content[..end],
        None => "",
    };
    if complete.len() + 1 < content.len() {
        tracing::warn!("[JsonlHistoryRepository] Ignoring incomplete trailing record");
    }

    complete
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    "[JsonlHistoryRepository] Skipping unreadable record on line {}: {}",
                    index + 1,
                    e
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_partial_trailing_line() {
        let content = concat!(
            r#"{"question":"q1","answer":"a1","threadId":"t","date":"2024-12-11T09:00:00Z"}"#,
            "\n",
            r#"{"question":"q2","answer":"a"#
        );
        let records = parse_records(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "q1");
    }

    #[test]
    fn test_parse_skips_corrupt_and_blank_lines() {
        let content = concat!(
            "not json\n",
            "\n",
            r#"{"question":"q","answer":"a","threadId":"t"}"#,
            "\n"
        );
        let records = parse_records(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn test_parse_without_newline_is_empty() {
        assert!(parse_records("").is_empty());
        assert!(parse_records(r#"{"question":"q""#).is_empty());
    }
}
