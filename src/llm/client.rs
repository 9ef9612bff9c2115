//! GenerativeClient: typed, schema-checked calls to a generative backend.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::prompts::{analyze_profile_prompt, quiz_prompt, roadmap_prompt};
use super::provider::{CallKind, GenerationRequest, GenerativeBackend, ImageAttachment};
use super::schema::descriptor;
use crate::error::GenerationError;

/// Input for one generation call. The variant determines the call kind.
#[derive(Debug, Clone)]
pub enum CallPayload {
    AnalyzeProfile {
        dossier: String,
        image: Option<ImageAttachment>,
    },
    GenerateQuiz {
        context: String,
        question_count: usize,
    },
    GenerateRoadmap {
        constellation: String,
        summary: String,
        phases: Vec<&'static str>,
    },
}

impl CallPayload {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::AnalyzeProfile { .. } => CallKind::AnalyzeProfile,
            Self::GenerateQuiz { .. } => CallKind::GenerateQuiz,
            Self::GenerateRoadmap { .. } => CallKind::GenerateRoadmap,
        }
    }
}

/// Wraps a backend with per-kind templates and response validation.
///
/// Every `invoke` is a fresh round trip: nothing is cached and concurrent
/// calls are never coalesced.
pub struct GenerativeClient {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

impl GenerativeClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue a call and return the schema-validated JSON value.
    pub async fn invoke(&self, payload: CallPayload) -> Result<Value, GenerationError> {
        let kind = payload.kind();
        let schema = descriptor(kind);
        let request = self.build_request(payload, schema.to_response_schema());

        info!(
            kind = %kind,
            provider = self.backend.name(),
            model = %self.model,
            has_image = request.image.is_some(),
            "Issuing generation call"
        );

        let raw = self.backend.generate(request).await.map_err(|e| {
            warn!(kind = %kind, error = %e, "Generation transport failed");
            GenerationError::new(kind, e)
        })?;

        let json_text = extract_json(&raw);
        let value: Value = serde_json::from_str(json_text).map_err(|e| {
            warn!(kind = %kind, error = %e, response = %raw, "Generation returned malformed JSON");
            GenerationError::malformed(kind, e)
        })?;

        schema.validate(&value).map_err(|violation| {
            warn!(kind = %kind, violation = %violation, "Generation failed schema validation");
            GenerationError::new(kind, violation)
        })?;

        debug!(kind = %kind, "Generation response validated");
        Ok(value)
    }

    /// `invoke`, then decode into a wire type.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        payload: CallPayload,
    ) -> Result<T, GenerationError> {
        let kind = payload.kind();
        let value = self.invoke(payload).await?;
        serde_json::from_value(value).map_err(|e| GenerationError::malformed(kind, e))
    }

    fn build_request(&self, payload: CallPayload, response_schema: Value) -> GenerationRequest {
        let kind = payload.kind();
        let (prompt, image) = match payload {
            CallPayload::AnalyzeProfile { dossier, image } => {
                (analyze_profile_prompt(&dossier), image)
            }
            CallPayload::GenerateQuiz {
                context,
                question_count,
            } => (quiz_prompt(&context, question_count), None),
            CallPayload::GenerateRoadmap {
                constellation,
                summary,
                phases,
            } => (roadmap_prompt(&constellation, &summary, &phases), None),
        };

        GenerationRequest {
            kind,
            model: self.model.clone(),
            prompt,
            image,
            response_schema,
        }
    }
}

/// Pull the JSON document out of model output that might be wrapped in
/// markdown fences or surrounded by chatter.
pub(crate) fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
