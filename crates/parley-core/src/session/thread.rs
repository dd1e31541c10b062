//! Conversation thread identifiers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one conversation thread.
///
/// Generated ids start with the local creation time so they sort by age; a
/// random suffix keeps two threads opened within the same millisecond apart.
/// Ids read back from storage are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Creates a fresh id from the current local time.
    pub fn generate() -> Self {
        Self::generate_at(Local::now())
    }

    pub fn generate_at(now: DateTime<Local>) -> Self {
        let suffix: u32 = rand::random();
        Self(format!("{}-{:08x}", now.format("%Y%m%d-%H%M%S%.3f"), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ThreadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_ids_are_time_prefixed_and_distinct() {
        let at = Local.with_ymd_and_hms(2024, 12, 11, 9, 30, 5).unwrap();
        let a = ThreadId::generate_at(at);
        let b = ThreadId::generate_at(at);
        assert!(a.as_str().starts_with("20241211-093005.000-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ThreadId::from("thread-a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"thread-a\"");
    }
}
