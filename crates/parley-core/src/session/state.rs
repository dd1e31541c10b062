//! In-memory message log for one conversation thread.

use tokio::sync::broadcast;

use super::{Message, SessionEvent, ThreadId};
use crate::error::{ParleyError, Result};
use crate::history::HistoryRecord;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Ordered log of messages for one conversation thread.
///
/// Every mutation is published as a [`SessionEvent`] to subscribers, which
/// is how a presentation layer follows the conversation while a request is
/// in flight. At most one placeholder message exists at any time.
pub struct SessionState {
    thread_id: ThreadId,
    messages: Vec<Message>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionState {
    /// Starts a new conversation with a freshly generated thread id.
    pub fn new() -> Self {
        Self::with_thread_id(ThreadId::generate())
    }

    pub fn with_thread_id(thread_id: ThreadId) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            thread_id,
            messages: Vec::new(),
            events,
        }
    }

    /// Rebuilds a session from one thread's persisted exchanges.
    ///
    /// Each record becomes a user message followed by a final assistant
    /// message. The thread id comes from the first record; an empty slice
    /// starts a new thread.
    pub fn from_history(records: &[HistoryRecord]) -> Self {
        let thread_id = records
            .first()
            .map(|record| record.thread_id.clone())
            .unwrap_or_else(ThreadId::generate);
        let mut session = Self::with_thread_id(thread_id);
        session.messages = records
            .iter()
            .flat_map(|record| {
                [
                    Message::user(record.question.clone()),
                    Message::assistant(record.answer.clone()),
                ]
            })
            .collect();
        session
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(Message::is_placeholder)
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &Message {
        self.append(Message::user(text))
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &Message {
        self.append(Message::assistant(text))
    }

    /// Appends the "awaiting response" marker.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Validation` if a placeholder is already present.
    pub fn push_placeholder(&mut self) -> Result<&Message> {
        if self.has_pending() {
            return Err(ParleyError::validation(
                "a response is already pending in this session",
            ));
        }
        Ok(self.append(Message::placeholder()))
    }

    /// Removes the placeholder, if any, and returns it.
    pub fn remove_placeholder(&mut self) -> Option<Message> {
        let index = self.messages.iter().position(Message::is_placeholder)?;
        let removed = self.messages.remove(index);
        self.publish(SessionEvent::MessageRemoved {
            message_id: removed.id.clone(),
        });
        Some(removed)
    }

    fn append(&mut self, message: Message) -> &Message {
        self.publish(SessionEvent::MessageAppended {
            message: message.clone(),
        });
        self.messages.push(message);
        // Just pushed, so the log is non-empty.
        &self.messages[self.messages.len() - 1]
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("thread_id", &self.thread_id)
            .field("messages", &self.messages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_only_one_placeholder_allowed() {
        let mut session = SessionState::new();
        session.push_user("hi");
        session.push_placeholder().unwrap();
        assert!(session.push_placeholder().is_err());
        assert_eq!(
            session
                .messages()
                .iter()
                .filter(|m| m.is_placeholder())
                .count(),
            1
        );
    }

    #[test]
    fn test_remove_placeholder_keeps_other_messages() {
        let mut session = SessionState::new();
        session.push_user("hi");
        session.push_placeholder().unwrap();
        let removed = session.remove_placeholder().unwrap();
        assert_eq!(removed.role, MessageRole::AssistantPlaceholder);
        assert_eq!(session.messages().len(), 1);
        assert!(session.remove_placeholder().is_none());
    }

    #[test]
    fn test_events_follow_mutation_order() {
        let mut session = SessionState::new();
        let mut events = session.subscribe();

        session.push_user("hi");
        let placeholder_id = session.push_placeholder().unwrap().id.clone();
        session.remove_placeholder();
        session.push_assistant("hello");

        match events.try_recv().unwrap() {
            SessionEvent::MessageAppended { message } => assert_eq!(message.text, "hi"),
            other => panic!("unexpected event: {:?}", other),
        }
        match events.try_recv().unwrap() {
            SessionEvent::MessageAppended { message } => assert!(message.is_placeholder()),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::MessageRemoved {
                message_id: placeholder_id
            }
        );
        match events.try_recv().unwrap() {
            SessionEvent::MessageAppended { message } => {
                assert_eq!(message.role, MessageRole::AssistantFinal);
                assert_eq!(message.text, "hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_from_history_interleaves_questions_and_answers() {
        let thread = ThreadId::from("thread-a");
        let at = Utc.with_ymd_and_hms(2024, 12, 11, 10, 0, 0).unwrap();
        let records = vec![
            HistoryRecord::new("q1", "a1", thread.clone(), at),
            HistoryRecord::new("q2", "a2", thread.clone(), at),
        ];

        let session = SessionState::from_history(&records);

        assert_eq!(session.thread_id(), &thread);
        let texts: Vec<_> = session.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["q1", "a1", "q2", "a2"]);
        assert_eq!(session.messages()[0].role, MessageRole::User);
        assert_eq!(session.messages()[1].role, MessageRole::AssistantFinal);
        assert!(!session.has_pending());
    }

    #[test]
    fn test_from_empty_history_starts_new_thread() {
        let session = SessionState::from_history(&[]);
        assert!(session.messages().is_empty());
        assert!(!session.thread_id().as_str().is_empty());
    }
}
