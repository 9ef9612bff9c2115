//! Generative backend integration.
//!
//! - `provider`: the `GenerativeBackend` trait and request types
//! - `schema`: declarative response descriptors and the generic validator
//! - `prompts`: instruction templates per call kind
//! - `client`: `GenerativeClient`, which ties the three together
//! - `gemini`: the HTTP backend used in production

pub mod client;
pub mod gemini;
pub mod prompts;
pub mod provider;
pub mod schema;

pub use client::{CallPayload, GenerativeClient};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use provider::{CallKind, GenerationRequest, GenerativeBackend, ImageAttachment};

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::BackendError;

/// Build the production client from configuration.
pub fn create_client(config: &AppConfig) -> Result<GenerativeClient, BackendError> {
    let backend = GeminiBackend::new(GeminiConfig {
        api_key: config.api_key.clone(),
        base_url: config.api_base.clone(),
        timeout: config.request_timeout,
    })?;
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(GenerativeClient::new(Arc::new(backend), config.model.clone()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<String, String>>>,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push_ok(&self, body: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(body.into()));
        }

        pub fn push_err(&self, reason: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Err(reason.into()));
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
            self.requests.lock().unwrap().push(request);
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Ok(body)) => Ok(body),
                Some(Err(reason)) => Err(BackendError::RequestFailed {
                    provider: "scripted".to_string(),
                    reason,
                }),
                None => Err(BackendError::RequestFailed {
                    provider: "scripted".to_string(),
                    reason: "script exhausted".to_string(),
                }),
            }
        }
    }

    pub fn client(backend: &Arc<ScriptedBackend>) -> Arc<GenerativeClient> {
        Arc::new(GenerativeClient::new(backend.clone(), "test-model"))
    }
}
