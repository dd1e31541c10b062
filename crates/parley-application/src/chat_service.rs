//! Conversation use case: ask, then record the answered exchange.

use parley_core::history::{HistoryRecord, HistoryRepository};
use parley_core::session::{SessionEvent, SessionState};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{AskOutcome, RequestOrchestrator};

/// Result of one conversational turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub outcome: AskOutcome,
    /// Whether the exchange reached the history store. Always `false` for
    /// outcomes that are not answers.
    pub persisted: bool,
}

/// One conversation thread bound to a history store.
pub struct ChatService {
    orchestrator: RequestOrchestrator,
    history: Arc<dyn HistoryRepository>,
    session: SessionState,
}

impl ChatService {
    /// Starts a fresh thread.
    pub fn new(orchestrator: RequestOrchestrator, history: Arc<dyn HistoryRepository>) -> Self {
        Self::with_session(orchestrator, history, SessionState::new())
    }

    /// Continues an existing session, e.g. one restored from history.
    pub fn with_session(
        orchestrator: RequestOrchestrator,
        history: Arc<dyn HistoryRepository>,
        session: SessionState,
    ) -> Self {
        Self {
            orchestrator,
            history,
            session,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub fn cancel_handle(&self) -> CancellationToken {
        self.orchestrator.cancel_handle()
    }

    /// Drops the current conversation and starts a new thread.
    pub fn start_new_thread(&mut self) {
        self.session = SessionState::new();
        tracing::info!("[ChatService] Started thread {}", self.session.thread_id());
    }

    pub async fn ask(&mut self, prompt: &str) -> ChatTurn {
        let cancel = self.orchestrator.cancel_handle().child_token();
        self.ask_with_cancel(prompt, &cancel).await
    }

    /// Asks and, if answered, appends the exchange to history.
    ///
    /// A failed append is logged and reported through
    /// [`ChatTurn::persisted`]; the session is left as the orchestrator
    /// produced it.
    pub async fn ask_with_cancel(&mut self, prompt: &str, cancel: &CancellationToken) -> ChatTurn {
        let outcome = self
            .orchestrator
            .ask_with_cancel(&mut self.session, prompt, cancel)
            .await;

        let persisted = match &outcome {
            AskOutcome::Answered { text } => {
                let record = HistoryRecord::now(prompt, text.clone(), self.session.thread_id().clone());
                match self.history.append(&record).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            "[ChatService] Failed to persist exchange for thread {}: {}",
                            record.thread_id,
                            e
                        );
                        false
                    }
                }
            }
            _ => false,
        };

        ChatTurn { outcome, persisted }
    }
}
