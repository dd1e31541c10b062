//! Error types for Parley.
//!
//! The taxonomy mirrors the request lifecycle: validation happens before any
//! I/O, transport and decoding failures can occur at submit or poll time,
//! polling can run out of attempts, and the history store can fail to write.
//! The user only ever sees one of two [`FailureNotice`] texts; the typed
//! variants stay available for logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text shown when a job ended without producing an answer.
pub const NO_ANSWER_FOUND: &str = "No answer found. Sorry!";

/// Text shown for every other failure.
pub const UNKNOWN_ERROR: &str = "Something went wrong. Please check your connection and try again.";

/// Last-resort description when a failed response carries no usable body.
pub const GENERIC_TRANSPORT_ERROR: &str = "An unknown error occurred";

/// Failure of a single HTTP exchange, as reported by a `TransportClient`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Failure while creating a prediction job.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitError {
    /// The prompt was empty; nothing was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The transport could not complete the request.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered but the job was not created.
    ///
    /// `reason` is the server-supplied message, the raw body, or the generic
    /// fallback text, in that priority order.
    #[error("submit rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// A success response could not be decoded or did not carry a usable
    /// poll URL.
    #[error("decoding error: {reason}")]
    Decoding { reason: String },
}

/// Failure while waiting for a prediction job to finish.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollError {
    /// Still `processing` after the whole attempt budget.
    #[error("job still processing after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The job reached a terminal status other than `succeeded`.
    #[error("job ended with status '{status}'")]
    ServerError { status: String },

    /// A status query failed at the transport level; never retried.
    #[error("transport error while polling: {0}")]
    Transport(#[from] TransportError),

    /// A status query was answered with a non-2xx HTTP status.
    #[error("status query returned HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// A status response could not be decoded.
    #[error("decoding error while polling: {reason}")]
    Decoding { reason: String },

    /// The job succeeded but every output fragment was absent or empty.
    #[error("job succeeded with empty output after {attempts} attempts")]
    EmptyOutput { attempts: u32 },

    /// The caller cancelled the exchange before it finished.
    #[error("polling cancelled")]
    Cancelled,
}

/// The two user-visible failure texts every lifecycle error collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureNotice {
    /// The job finished (or gave up) without an answer.
    NoAnswer,
    /// Anything else.
    UnknownError,
}

impl FailureNotice {
    pub fn text(self) -> &'static str {
        match self {
            FailureNotice::NoAnswer => NO_ANSWER_FOUND,
            FailureNotice::UnknownError => UNKNOWN_ERROR,
        }
    }
}

impl SubmitError {
    /// Submit failures always surface as the generic failure text.
    pub fn notice(&self) -> FailureNotice {
        FailureNotice::UnknownError
    }
}

impl PollError {
    /// Maps a poll failure to its user-visible text.
    ///
    /// `None` for cancellation, which ends the exchange without a final
    /// assistant message.
    pub fn notice(&self) -> Option<FailureNotice> {
        match self {
            PollError::Exhausted { .. }
            | PollError::ServerError { .. }
            | PollError::EmptyOutput { .. } => Some(FailureNotice::NoAnswer),
            PollError::Transport(_) | PollError::Http { .. } | PollError::Decoding { .. } => {
                Some(FailureNotice::UnknownError)
            }
            PollError::Cancelled => None,
        }
    }
}

/// A shared error type for the whole Parley workspace.
#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    /// Input rejected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Job creation failed.
    #[error("Submit failed: {0}")]
    Submit(#[from] SubmitError),

    /// Waiting for a job failed.
    #[error("Poll failed: {0}")]
    Poll(#[from] PollError),

    /// The durable history store failed to write or read.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Submit(SubmitError::Validation(_)))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ParleyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ParleyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;
