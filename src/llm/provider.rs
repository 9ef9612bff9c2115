//! Backend abstraction: request/response types and the `GenerativeBackend` trait.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, ValidationError};

/// The three kinds of generation call the flow issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallKind {
    AnalyzeProfile,
    GenerateQuiz,
    GenerateRoadmap,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AnalyzeProfile => "ANALYZE_PROFILE",
            Self::GenerateQuiz => "GENERATE_QUIZ",
            Self::GenerateRoadmap => "GENERATE_ROADMAP",
        };
        write!(f, "{s}")
    }
}

/// MIME type assumed when an image arrives as bare base64.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Binary image data attached to an ANALYZE_PROFILE call.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL, or bare base64.
    pub fn from_data_url(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) =
                    rest.split_once(',').ok_or_else(|| ValidationError::InvalidImage {
                        reason: "data URL has no payload".to_string(),
                    })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    ValidationError::InvalidImage {
                        reason: "only base64 data URLs are supported".to_string(),
                    }
                })?;
                if !mime.starts_with("image/") {
                    return Err(ValidationError::InvalidImage {
                        reason: format!("unsupported media type {mime}"),
                    });
                }
                (mime.to_string(), payload)
            }
            None => (DEFAULT_IMAGE_MIME.to_string(), input),
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ValidationError::InvalidImage {
                reason: e.to_string(),
            })?;
        if bytes.is_empty() {
            return Err(ValidationError::InvalidImage {
                reason: "image is empty".to_string(),
            });
        }
        Ok(Self { mime_type, bytes })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// One request to a generative backend.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: CallKind,
    /// Model identifier, e.g. "gemini-3-flash-preview".
    pub model: String,
    pub prompt: String,
    pub image: Option<ImageAttachment>,
    /// Expected output schema in the backend's wire format.
    pub response_schema: serde_json::Value,
}

/// A generative model endpoint. Returns the raw response text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Provider name for logs and errors.
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError>;
}
