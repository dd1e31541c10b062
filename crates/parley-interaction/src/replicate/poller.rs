use parley_core::config::PollConfig;
use parley_core::error::PollError;
use parley_core::transport::{TransportClient, TransportRequest};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::dto::{
    PredictionMetrics, PredictionResponse, STATUS_PROCESSING, STATUS_SUCCEEDED,
    extract_error_message,
};
use super::{PollHandle, concatenate_fragments};

/// Output of a job that reached `succeeded`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub fragments: Vec<Option<String>>,
    pub metrics: Option<PredictionMetrics>,
    /// Status queries issued, including the successful one.
    pub attempts: u32,
}

impl PollOutcome {
    pub fn text(&self) -> String {
        concatenate_fragments(&self.fragments)
    }
}

/// Waits for a job to finish with a bounded, fixed-interval retry loop.
///
/// Only `processing` is retried. The interval never grows, and no sleep
/// follows the last attempt.
pub struct JobPoller {
    transport: Arc<dyn TransportClient>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(transport: Arc<dyn TransportClient>, config: PollConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls `handle` until it succeeds, fails, runs out of attempts or is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// - `PollError::Exhausted` after `max_attempts` queries still `processing`.
    /// - `PollError::ServerError` for any other non-success status.
    /// - `PollError::Transport`, `PollError::Http` or `PollError::Decoding`
    ///   on the first failed query; these are not retried.
    /// - `PollError::Cancelled` when `cancel` fires, including mid-sleep.
    pub async fn poll_until_done(
        &self,
        handle: &PollHandle,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, PollError> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                status = self.fetch_status(handle) => status?,
            };

            match status.status.as_str() {
                STATUS_SUCCEEDED => {
                    tracing::debug!(
                        "[JobPoller] Job {} succeeded after {} attempt(s)",
                        handle.job_id,
                        attempt
                    );
                    return Ok(PollOutcome {
                        fragments: status.output.unwrap_or_default(),
                        metrics: status.metrics,
                        attempts: attempt,
                    });
                }
                STATUS_PROCESSING => {
                    tracing::debug!(
                        "[JobPoller] Job {} still processing (attempt {}/{})",
                        handle.job_id,
                        attempt,
                        max_attempts
                    );
                    if attempt < max_attempts {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return Err(PollError::Cancelled),
                            _ = tokio::time::sleep(self.config.interval) => {}
                        }
                    }
                }
                other => {
                    tracing::warn!(
                        "[JobPoller] Job {} ended with status '{}': {:?}",
                        handle.job_id,
                        other,
                        status.error
                    );
                    return Err(PollError::ServerError {
                        status: other.to_string(),
                    });
                }
            }
        }

        Err(PollError::Exhausted {
            attempts: max_attempts,
        })
    }

    async fn fetch_status(&self, handle: &PollHandle) -> Result<PredictionResponse, PollError> {
        let mut request = TransportRequest::get(&handle.poll_url).header("Accept", "application/json");
        if let Some(credential) = self.config.credential.header_value() {
            request = request.header("Authorization", credential);
        }

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(PollError::Http {
                status: response.status,
                reason: extract_error_message(&response.body),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::debug!("[JobPoller] Undecodable status response: {}", e);
            PollError::Decoding {
                reason: extract_error_message(&response.body),
            }
        })
    }
}
