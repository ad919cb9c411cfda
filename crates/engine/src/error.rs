//! Error types for configuration loading and host side effects.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

/// Failure reported by a [`crate::ClipboardSink`].
#[derive(Debug, Clone, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);
