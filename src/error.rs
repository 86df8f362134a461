//! Error types for cachegate
//!
//! All modules use `CacheGateResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cachegate operations
pub type CacheGateResult<T> = Result<T, CacheGateError>;

/// All errors that can occur during a run
#[derive(Error, Debug)]
pub enum CacheGateError {
    // Configuration errors
    #[error("Missing required variable: {name}")]
    ConfigMissing { name: &'static str },

    #[error("Invalid value for {name}: {reason}")]
    ConfigValue { name: &'static str, reason: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    // API errors
    #[error("Failed to retrieve caches: {status} {body} {url}")]
    CacheList { status: u16, body: String, url: String },

    #[error("Failed to clear cache {name}: {body}")]
    CacheDelete { name: String, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CacheGateError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigMissing { name } if name.starts_with("BITBUCKET_") => {
                Some("Define it as a secured repository variable and pass it to the pipe")
            }
            Self::ConfigMissing { .. } => {
                Some("Set it in the pipe variables or in .cachegate.toml")
            }
            Self::CacheList { status: 401 | 403, .. } => Some(
                "Check BITBUCKET_USERNAME and BITBUCKET_APP_PASSWORD; the app password needs pipeline write access",
            ),
            Self::CacheList { status: 404, .. } => Some("Check WORKSPACE and REPO_SLUG"),
            _ => None,
        }
    }
}
