//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the generative backend.
    pub api_key: SecretString,
    /// Model identifier sent with every request.
    pub model: String,
    /// Base URL of the generative backend.
    pub api_base: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    pub port: u16,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
    /// Number of quiz questions requested per profile.
    pub quiz_length: usize,
    /// Directory for rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(60),
            quiz_length: 3,
            log_dir: None,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let defaults = Self::with_api_key(api_key);

        let port = match get("ASTROGRAPH_PORT") {
            Some(v) => parse_value("ASTROGRAPH_PORT", &v)?,
            None => defaults.port,
        };
        let request_timeout = match get("ASTROGRAPH_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_value("ASTROGRAPH_REQUEST_TIMEOUT_SECS", &v)?),
            None => defaults.request_timeout,
        };
        let quiz_length: usize = match get("ASTROGRAPH_QUIZ_LENGTH") {
            Some(v) => parse_value("ASTROGRAPH_QUIZ_LENGTH", &v)?,
            None => defaults.quiz_length,
        };
        if quiz_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ASTROGRAPH_QUIZ_LENGTH".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            model: get("ASTROGRAPH_MODEL").unwrap_or(defaults.model),
            api_base: get("ASTROGRAPH_API_BASE").unwrap_or(defaults.api_base),
            bind_addr: get("ASTROGRAPH_BIND").unwrap_or(defaults.bind_addr),
            log_dir: get("ASTROGRAPH_LOG_DIR").map(PathBuf::from),
            port,
            request_timeout,
            quiz_length,
            api_key: defaults.api_key,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
