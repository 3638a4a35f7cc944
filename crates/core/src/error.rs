//! Error types for the Board Game Helper service.
//!
//! Every fallible function returns `AppResult<T>`. Each `AppError` variant
//! belongs to one of three request-level kinds (see [`ErrorKind`]), which is
//! what the HTTP surface uses to pick a status code.

use thiserror::Error;

/// Unified error type for the service.
///
/// We never panic on request paths; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// The caller sent something we refuse to process (wrong file type,
    /// blank question, malformed request).
    #[error("{0}")]
    InvalidInput(String),

    /// The referenced session does not exist (or was deleted).
    #[error("{0}")]
    NotFound(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF staging, extraction and chunking failures
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Embedding provider failures
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Similarity index failures
    #[error("Index error: {0}")]
    Index(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Request-level error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input, maps to 400.
    InvalidInput,
    /// Unknown session, maps to 404.
    NotFound,
    /// Anything that failed while extracting, chunking, embedding, indexing,
    /// retrieving or generating. Maps to 500.
    Processing,
}

impl AppError {
    /// Classify this error into the request-level taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Processing,
        }
    }

    /// Shorthand for an unknown-session error.
    pub fn session_not_found(session_id: &str) -> Self {
        AppError::NotFound(format!(
            "Session ID '{}' not found. Please upload a document first.",
            session_id
        ))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Replace every occurrence of `secret` in `message` with a placeholder.
///
/// Provider error bodies are surfaced to callers, so anything that might echo
/// a credential passes through here first.
pub fn redact(message: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => message.replace(secret, "[REDACTED]"),
        _ => message.to_string(),
    }
}
