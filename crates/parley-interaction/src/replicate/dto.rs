//! Wire types for the prediction API.

use parley_core::error::GENERIC_TRANSPORT_ERROR;
use serde::{Deserialize, Serialize};

pub const STATUS_SUCCEEDED: &str = "succeeded";
pub const STATUS_PROCESSING: &str = "processing";

/// Body of the job-creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePredictionRequest<'a> {
    pub version: &'a str,
    pub input: PredictionInput<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput<'a> {
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub system_prompt: &'a str,
}

/// Job-creation and job-status response.
///
/// Both endpoints return the same prediction object; fields not present at
/// a given stage are simply absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
    /// Streamed text fragments; individual entries may be null.
    #[serde(default)]
    pub output: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub metrics: Option<PredictionMetrics>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionUrls {
    #[serde(default)]
    pub get: Option<String>,
    #[serde(default)]
    pub cancel: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
}

/// Timing and token counts reported by a finished job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    #[serde(default)]
    pub input_token_count: Option<u64>,
    #[serde(default)]
    pub output_token_count: Option<u64>,
    #[serde(default)]
    pub predict_time: Option<f64>,
    #[serde(default)]
    pub tokens_per_second: Option<f64>,
}

/// Error body returned by the service for rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(alias = "detail")]
    message: String,
}

/// Human-readable reason for a failed response.
///
/// Uses the structured `message` (or `detail`) field when the body decodes,
/// else the raw body text, else a generic fallback.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(body) {
        if !error.message.trim().is_empty() {
            return error.message;
        }
    }
    let raw = body.trim();
    if raw.is_empty() {
        GENERIC_TRANSPORT_ERROR.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_structured_field() {
        assert_eq!(
            extract_error_message(r#"{"message":"Invalid version"}"#),
            "Invalid version"
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"Authentication credentials were not provided."}"#),
            "Authentication credentials were not provided."
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(
            extract_error_message(r#"{"unexpected":true}"#),
            r#"{"unexpected":true}"#
        );
    }

    #[test]
    fn test_error_message_generic_when_body_empty() {
        assert_eq!(extract_error_message(""), GENERIC_TRANSPORT_ERROR);
        assert_eq!(extract_error_message("  \n"), GENERIC_TRANSPORT_ERROR);
    }

    #[test]
    fn test_create_request_uses_version_key() {
        let body = CreatePredictionRequest {
            version: "abc",
            input: PredictionInput {
                prompt: "hi",
                max_tokens: 1024,
                system_prompt: "You are a helpful assistant.",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["version"], "abc");
        assert_eq!(value["input"]["max_tokens"], 1024);
        assert_eq!(value["input"]["system_prompt"], "You are a helpful assistant.");
    }

    #[test]
    fn test_status_response_tolerates_null_fragments() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{"id":"p1","status":"succeeded","output":[null,"a","","b"],
                "urls":{"get":"https://x/p1","cancel":"https://x/p1/cancel"},
                "metrics":{"output_token_count":3,"predict_time":0.5}}"#,
        )
        .unwrap();
        assert_eq!(response.output.unwrap().len(), 4);
        assert_eq!(response.metrics.unwrap().output_token_count, Some(3));
        assert_eq!(response.urls.unwrap().stream, None);
    }
}
