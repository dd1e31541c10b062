use serde::{Deserialize, Serialize};

use super::Message;

/// Mutations published by a [`SessionState`](super::SessionState).
///
/// Subscribers receive them in the order the session applied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended { message: Message },
    MessageRemoved { message_id: String },
}
