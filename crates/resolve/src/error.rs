use serde::{Serialize, Serializer};

/// Failure of a remote lookup. The message is shown inline in the overlay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("no result for '{0}'")]
    NotFound(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("lookup failed unexpectedly")]
    Panicked,
}

impl Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ResolveError::InvalidResponse(e.to_string())
        } else {
            ResolveError::Request(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
