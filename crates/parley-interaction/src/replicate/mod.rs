//! Job-based completion protocol: create a prediction, then poll it.

pub mod dto;
mod poller;
mod submitter;

pub use dto::{PredictionMetrics, extract_error_message};
pub use poller::{JobPoller, PollOutcome};
pub use submitter::JobSubmitter;

/// Server-issued reference to a created job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollHandle {
    pub job_id: String,
    /// Status endpoint queried by the poller.
    pub poll_url: String,
}

impl PollHandle {
    pub fn new(job_id: impl Into<String>, poll_url: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            poll_url: poll_url.into(),
        }
    }
}

/// Joins output fragments in order, skipping absent and empty ones.
pub fn concatenate_fragments(fragments: &[Option<String>]) -> String {
    fragments
        .iter()
        .flatten()
        .filter(|fragment| !fragment.is_empty())
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenate_skips_nulls_and_empties() {
        let fragments = vec![None, Some("a".to_string()), Some(String::new()), Some("b".to_string())];
        assert_eq!(concatenate_fragments(&fragments), "ab");
    }

    #[test]
    fn test_concatenate_keeps_whitespace_fragments() {
        let fragments = vec![Some("Hello".to_string()), Some(" ".to_string()), Some("world".to_string())];
        assert_eq!(concatenate_fragments(&fragments), "Hello world");
        assert_eq!(concatenate_fragments(&[]), "");
    }
}
