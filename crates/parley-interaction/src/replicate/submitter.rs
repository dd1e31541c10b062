use parley_core::config::SubmitConfig;
use parley_core::error::{SubmitError, TransportError};
use parley_core::transport::{TransportClient, TransportRequest};
use std::sync::Arc;

use super::PollHandle;
use super::dto::{CreatePredictionRequest, PredictionInput, PredictionResponse, extract_error_message};

/// Creates prediction jobs.
///
/// Holds no state besides its injected configuration; every call is one
/// POST to the configured endpoint.
pub struct JobSubmitter {
    transport: Arc<dyn TransportClient>,
    config: SubmitConfig,
}

impl JobSubmitter {
    pub fn new(transport: Arc<dyn TransportClient>, config: SubmitConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Submits `prompt` and returns the handle to poll.
    ///
    /// # Errors
    ///
    /// - `SubmitError::Validation` for an empty or whitespace-only prompt;
    ///   nothing is sent.
    /// - `SubmitError::Transport` if the request could not be completed.
    /// - `SubmitError::Rejected` for a non-2xx response, carrying the
    ///   extracted error message.
    /// - `SubmitError::Decoding` if a 2xx response does not decode (reason
    ///   extracted like a rejection's) or has no poll URL.
    pub async fn submit(&self, prompt: &str) -> Result<PollHandle, SubmitError> {
        if prompt.trim().is_empty() {
            return Err(SubmitError::Validation("prompt must not be empty".into()));
        }

        let body = CreatePredictionRequest {
            version: &self.config.model_version,
            input: PredictionInput {
                prompt,
                max_tokens: self.config.max_tokens,
                system_prompt: &self.config.system_prompt,
            },
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| TransportError::InvalidRequest(format!("request body: {e}")))?;

        let mut request = TransportRequest::post_json(&self.config.endpoint, body)
            .header("Accept", "application/json");
        if let Some(credential) = self.config.credential.header_value() {
            request = request.header("Authorization", credential);
        }

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let reason = extract_error_message(&response.body);
            tracing::warn!(
                "[JobSubmitter] Job creation rejected with HTTP {}: {}",
                response.status,
                reason
            );
            return Err(SubmitError::Rejected {
                status: response.status,
                reason,
            });
        }

        let created: PredictionResponse = serde_json::from_str(&response.body).map_err(|e| {
            tracing::debug!("[JobSubmitter] Undecodable job creation response: {}", e);
            SubmitError::Decoding {
                reason: extract_error_message(&response.body),
            }
        })?;
        let poll_url = created
            .urls
            .and_then(|urls| urls.get)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SubmitError::Decoding {
                reason: format!("job '{}' has no status URL", created.id),
            })?;

        tracing::info!(
            "[JobSubmitter] Created job {} (status: {})",
            created.id,
            created.status
        );
        Ok(PollHandle::new(created.id, poll_url))
    }
}
