//! Request lifecycle: user message, placeholder, submit, poll, final message.

use parley_core::config::ParleyConfig;
use parley_core::error::{FailureNotice, ParleyError, PollError, Result};
use parley_core::session::SessionState;
use parley_core::transport::TransportClient;
use parley_interaction::presets::resolve_system_prompt;
use parley_interaction::{JobPoller, JobSubmitter, PollOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How one `ask` ended.
#[derive(Debug, Clone)]
pub enum AskOutcome {
    /// The job produced text; it was appended as the final assistant message.
    Answered { text: String },
    /// The exchange failed; `notice.text()` was appended as the final
    /// assistant message. `error` keeps the precise cause for logging.
    Failed {
        notice: FailureNotice,
        error: ParleyError,
    },
    /// Nothing was sent and the session is unchanged.
    Rejected { error: ParleyError },
    /// Cancelled before anything was sent (session unchanged) or while in
    /// flight (placeholder removed, no final message appended).
    Cancelled,
}

impl AskOutcome {
    /// Text of the final assistant message this outcome appended, if any.
    pub fn final_text(&self) -> Option<&str> {
        match self {
            AskOutcome::Answered { text } => Some(text),
            AskOutcome::Failed { notice, .. } => Some(notice.text()),
            AskOutcome::Rejected { .. } | AskOutcome::Cancelled => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, AskOutcome::Answered { .. })
    }
}

/// Drives one exchange at a time against a session.
///
/// `ask` borrows the session mutably for the whole exchange, so asks on the
/// same session are serialised by construction.
pub struct RequestOrchestrator {
    submitter: JobSubmitter,
    poller: JobPoller,
    shutdown: CancellationToken,
}

impl RequestOrchestrator {
    pub fn new(submitter: JobSubmitter, poller: JobPoller) -> Self {
        Self {
            submitter,
            poller,
            shutdown: CancellationToken::new(),
        }
    }

    /// Builds submitter and poller from configuration over one transport.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if the configuration is incomplete or
    /// names an unknown preset.
    pub fn from_config(transport: Arc<dyn TransportClient>, config: &ParleyConfig) -> Result<Self> {
        config.validate()?;
        let system_prompt = resolve_system_prompt(&config.generation)?;
        Ok(Self::new(
            JobSubmitter::new(transport.clone(), config.submit_config(system_prompt)),
            JobPoller::new(transport, config.poll_config()),
        ))
    }

    /// Token that ends the current ask and every later one when cancelled.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn ask(&self, session: &mut SessionState, prompt: &str) -> AskOutcome {
        let cancel = self.shutdown.child_token();
        self.ask_with_cancel(session, prompt, &cancel).await
    }

    /// Runs one exchange, abandoning it if `cancel` fires during submit or
    /// polling. A cancelled `cancel` or shutdown token sends nothing.
    pub async fn ask_with_cancel(
        &self,
        session: &mut SessionState,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> AskOutcome {
        if prompt.trim().is_empty() {
            tracing::debug!("[RequestOrchestrator] Rejected empty prompt");
            return AskOutcome::Rejected {
                error: ParleyError::validation("prompt must not be empty"),
            };
        }
        if session.has_pending() {
            tracing::warn!(
                "[RequestOrchestrator] Rejected prompt: thread {} already has a pending response",
                session.thread_id()
            );
            return AskOutcome::Rejected {
                error: ParleyError::validation("a response is already pending in this session"),
            };
        }

        if cancel.is_cancelled() || self.shutdown.is_cancelled() {
            tracing::debug!("[RequestOrchestrator] Skipped prompt: already cancelled");
            return AskOutcome::Cancelled;
        }

        session.push_user(prompt);
        if let Err(error) = session.push_placeholder() {
            return AskOutcome::Failed {
                notice: FailureNotice::UnknownError,
                error,
            };
        }

        let result = self.run_job(prompt, cancel).await;
        session.remove_placeholder();

        match result {
            Ok(outcome) => {
                let text = outcome.text();
                if text.is_empty() {
                    self.fail(
                        session,
                        PollError::EmptyOutput {
                            attempts: outcome.attempts,
                        }
                        .into(),
                        FailureNotice::NoAnswer,
                    )
                } else {
                    tracing::info!(
                        "[RequestOrchestrator] Answered in thread {} after {} attempt(s)",
                        session.thread_id(),
                        outcome.attempts
                    );
                    if let Some(metrics) = &outcome.metrics {
                        tracing::debug!("[RequestOrchestrator] Job metrics: {:?}", metrics);
                    }
                    session.push_assistant(text.clone());
                    AskOutcome::Answered { text }
                }
            }
            Err(ParleyError::Poll(PollError::Cancelled)) => {
                tracing::info!(
                    "[RequestOrchestrator] Cancelled pending response in thread {}",
                    session.thread_id()
                );
                AskOutcome::Cancelled
            }
            Err(error) => {
                let notice = notice_for(&error);
                self.fail(session, error, notice)
            }
        }
    }

    async fn run_job(&self, prompt: &str, cancel: &CancellationToken) -> Result<PollOutcome> {
        let handle = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PollError::Cancelled.into()),
            handle = self.submitter.submit(prompt) => handle?,
        };
        let outcome = self.poller.poll_until_done(&handle, cancel).await?;
        Ok(outcome)
    }

    fn fail(&self, session: &mut SessionState, error: ParleyError, notice: FailureNotice) -> AskOutcome {
        tracing::warn!(
            "[RequestOrchestrator] Exchange failed in thread {}: {}",
            session.thread_id(),
            error
        );
        session.push_assistant(notice.text());
        AskOutcome::Failed { notice, error }
    }
}

fn notice_for(error: &ParleyError) -> FailureNotice {
    match error {
        ParleyError::Submit(submit) => submit.notice(),
        ParleyError::Poll(poll) => poll.notice().unwrap_or(FailureNotice::UnknownError),
        _ => FailureNotice::UnknownError,
    }
}
