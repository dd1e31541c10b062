//! Conversation message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Prompt typed by the user.
    User,
    /// Transient marker for an in-flight job.
    AssistantPlaceholder,
    /// Answer (or failure notice) for a finished job.
    AssistantFinal,
}

/// A single message in a session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique per message, never reused.
    pub id: String,
    pub role: MessageRole,
    pub text: String,
}

impl Message {
    fn with_role(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, text)
    }

    pub fn placeholder() -> Self {
        Self::with_role(MessageRole::AssistantPlaceholder, "")
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_role(MessageRole::AssistantFinal, text)
    }

    pub fn is_placeholder(&self) -> bool {
        self.role == MessageRole::AssistantPlaceholder
    }
}
