//! Error types for Astrograph.

use crate::llm::CallKind;
use crate::session::Stage;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl Error {
    /// Short machine-readable name of the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Generation(_) => "generation",
            Self::State(_) => "state",
        }
    }
}

/// Configuration-related errors. Raised at startup only.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Caller-side precondition violations. Never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Dossier is empty: provide text or an image")]
    EmptyDossier,

    #[error("Invalid image data: {reason}")]
    InvalidImage { reason: String },

    #[error("Answer index {index} out of range, expected 0..{options}")]
    AnswerOutOfRange { index: usize, options: usize },
}

/// Transport-level failures talking to the generative backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// A backend response that does not match the expected schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: value {value:?} is not one of {allowed:?}")]
    NotAllowed {
        path: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{path}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        path: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{path}: expected {expected} items, found {found}")]
    WrongLength {
        path: String,
        expected: String,
        found: usize,
    },
}

/// Why a generation call failed.
#[derive(Debug, thiserror::Error)]
pub enum GenerationCause {
    #[error(transparent)]
    Transport(#[from] BackendError),

    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response failed schema validation: {0}")]
    Schema(#[from] SchemaViolation),
}

/// Failure of one call to the generative backend.
#[derive(Debug, thiserror::Error)]
#[error("{kind} failed: {cause}")]
pub struct GenerationError {
    pub kind: CallKind,
    #[source]
    pub cause: GenerationCause,
}

impl GenerationError {
    pub fn new(kind: CallKind, cause: impl Into<GenerationCause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn malformed(kind: CallKind, reason: impl std::fmt::Display) -> Self {
        Self {
            kind,
            cause: GenerationCause::MalformedJson(reason.to_string()),
        }
    }
}

/// An operation invoked while the session cannot accept it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("{operation} is not allowed in stage {stage}")]
    WrongStage {
        operation: &'static str,
        stage: Stage,
    },

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("A {kind} call is already in flight")]
    CallInFlight { kind: CallKind },

    #[error("The quiz is still in progress")]
    QuizInProgress,

    #[error("The quiz is already completed")]
    QuizCompleted,

    #[error("{kind} result discarded: session moved from generation {issued} to {current}")]
    Superseded {
        kind: CallKind,
        issued: u64,
        current: u64,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
