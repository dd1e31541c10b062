//! History record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::ThreadId;

/// One answered question, persisted once and never changed.
///
/// Stored as `{question, answer, threadId, date}`. Records written by older
/// builds may lack `date`; those are kept in storage but left out of
/// aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub question: String,
    pub answer: String,
    #[serde(rename = "threadId")]
    pub thread_id: ThreadId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl HistoryRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        thread_id: ThreadId,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            thread_id,
            date: Some(date),
        }
    }

    /// Record stamped with the current time.
    pub fn now(question: impl Into<String>, answer: impl Into<String>, thread_id: ThreadId) -> Self {
        Self::new(question, answer, thread_id, Utc::now())
    }
}

/// Which record set a history store holds.
///
/// Exchanges with the remote service and exchanges answered on-device are
/// kept apart and browsed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    #[default]
    Online,
    Offline,
}

impl HistoryKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            HistoryKind::Online => "online",
            HistoryKind::Offline => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_persisted_shape_uses_thread_id_key() {
        let at = Utc.with_ymd_and_hms(2024, 12, 11, 8, 0, 0).unwrap();
        let record = HistoryRecord::new("q", "a", ThreadId::from("t-1"), at);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["threadId"], "t-1");
        assert_eq!(value["date"], "2024-12-11T08:00:00Z");
    }

    #[test]
    fn test_missing_date_deserializes_to_none() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"question":"q","answer":"a","threadId":"t"}"#).unwrap();
        assert_eq!(record.date, None);
    }
}
