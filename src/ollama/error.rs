//! Error types for the Ollama client

use thiserror::Error;

/// Errors from the model-serving runtime
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Runtime unreachable (connect/timeout failures)
    #[error("Ollama unreachable: {0}")]
    Unreachable(String),

    /// Non-2xx HTTP response
    #[error("Ollama HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            OllamaError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            OllamaError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OllamaError {
    fn from(err: serde_json::Error) -> Self {
        OllamaError::Serialization(err.to_string())
    }
}
