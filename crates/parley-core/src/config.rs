//! Configuration model.
//!
//! `ParleyConfig` is the on-disk shape (`config.toml`). The submit and poll
//! components never read it directly: they receive the narrower
//! [`SubmitConfig`] and [`PollConfig`] at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{ParleyError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.replicate.com/v1/predictions";
pub const DEFAULT_AUTH_SCHEME: &str = "Token";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Root configuration structure for config.toml
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ParleyConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Remote prediction service settings.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub model_version: String,
    /// Static credential passed through to the transport as-is.
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
}

/// Prompt shaping settings sent with every job.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Name of a built-in system prompt preset; wins over `system_prompt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

/// Poll loop settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_auth_scheme() -> String {
    DEFAULT_AUTH_SCHEME.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_version: String::new(),
            api_token: String::new(),
            auth_scheme: default_auth_scheme(),
        }
    }
}

// The token never reaches logs.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("model_version", &self.model_version)
            .field("api_token", &redact(&self.api_token))
            .field("auth_scheme", &self.auth_scheme)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            preset: None,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl ParleyConfig {
    /// Checks the values the submit/poll pipeline cannot work without.
    ///
    /// The API token is not required here; an unauthenticated request fails
    /// at the service like any other rejected submit.
    pub fn validate(&self) -> Result<()> {
        if self.service.endpoint.trim().is_empty() {
            return Err(ParleyError::config("service.endpoint must not be empty"));
        }
        if self.service.model_version.trim().is_empty() {
            return Err(ParleyError::config(
                "service.model_version must not be empty",
            ));
        }
        if self.polling.max_attempts == 0 {
            return Err(ParleyError::config(
                "polling.max_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    /// Builds the submit-side view with an already resolved system prompt.
    pub fn submit_config(&self, system_prompt: impl Into<String>) -> SubmitConfig {
        SubmitConfig {
            endpoint: self.service.endpoint.clone(),
            model_version: self.service.model_version.clone(),
            credential: Credential::new(&self.service.auth_scheme, &self.service.api_token),
            max_tokens: self.generation.max_tokens,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            credential: Credential::new(&self.service.auth_scheme, &self.service.api_token),
            max_attempts: self.polling.max_attempts,
            interval: Duration::from_millis(self.polling.interval_ms),
        }
    }
}

/// Authorization header value, kept opaque.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    /// Builds `"<scheme> <token>"`; an empty token yields an empty credential.
    pub fn new(scheme: &str, token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Self(String::new());
        }
        let scheme = scheme.trim();
        if scheme.is_empty() {
            Self(token.to_string())
        } else {
            Self(format!("{} {}", scheme, token))
        }
    }

    pub fn header_value(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&redact(&self.0)).finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Values injected into the job submitter.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitConfig {
    pub endpoint: String,
    pub model_version: String,
    pub credential: Credential,
    pub max_tokens: u32,
    pub system_prompt: String,
}

/// Values injected into the job poller.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub credential: Credential,
    pub max_attempts: u32,
    /// Fixed delay between attempts; never grows.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            credential: Credential::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_hosted_prediction_service() {
        let config = ParleyConfig::default();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.generation.max_tokens, 1024);
        assert_eq!(config.polling.max_attempts, 10);
        assert_eq!(config.poll_config().interval, Duration::from_secs(2));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ParleyConfig = toml::from_str(
            r#"
[service]
model_version = "abc123"

[polling]
max_attempts = 3
"#,
        )
        .unwrap();
        assert_eq!(config.service.model_version, "abc123");
        assert_eq!(config.service.auth_scheme, "Token");
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.polling.interval_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = ParleyConfig::default();
        config.service.model_version = "v".into();
        config.polling.max_attempts = 0;
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_validate_requires_model_version() {
        assert!(ParleyConfig::default().validate().is_err());
    }

    #[test]
    fn test_credential_formatting_and_redaction() {
        let credential = Credential::new("Token", "r8_secret");
        assert_eq!(credential.header_value(), Some("Token r8_secret"));
        assert!(!format!("{:?}", credential).contains("r8_secret"));

        assert_eq!(Credential::new("Token", "  ").header_value(), None);
        assert_eq!(Credential::new("", "raw").header_value(), Some("raw"));
    }

    #[test]
    fn test_service_debug_redacts_token() {
        let mut config = ParleyConfig::default();
        config.service.api_token = "r8_secret".into();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("r8_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
