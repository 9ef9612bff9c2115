//! Gemini `generateContent` backend over plain HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use super::provider::{GenerationRequest, GenerativeBackend};
use crate::error::BackendError;

const PROVIDER: &str = "gemini";

/// Connection settings for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: String,
    pub timeout: Duration,
}

/// HTTP client for Google's Generative Language API.
pub struct GeminiBackend {
    http: ReqwestClient,
    api_key: SecretString,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
        let url = self.endpoint(&request.model);
        let body = build_body(&request);
        debug!(url = %url, kind = %request.kind, "POST generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(status_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        extract_text(&payload)
    }
}

/// Build the `generateContent` request body.
fn build_body(request: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.to_base64(),
            }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema,
        }
    })
}

/// Concatenate the text parts of the first candidate.
fn extract_text(payload: &Value) -> Result<String, BackendError> {
    let invalid = |reason: &str| BackendError::InvalidResponse {
        provider: PROVIDER.to_string(),
        reason: reason.to_string(),
    };

    let candidate = payload
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| match payload["promptFeedback"]["blockReason"].as_str() {
            Some(reason) => invalid(&format!("prompt blocked: {reason}")),
            None => invalid("no candidates in response"),
        })?;

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let finish = candidate["finishReason"].as_str().unwrap_or("unknown");
        return Err(invalid(&format!("empty candidate (finish reason: {finish})")));
    }
    Ok(text)
}

fn status_error(status: StatusCode, body: String) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::AuthFailed {
            provider: PROVIDER.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited {
            provider: PROVIDER.to_string(),
        },
        _ => BackendError::Status {
            provider: PROVIDER.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}
