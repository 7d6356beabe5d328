//! Client for the external model-serving runtime (Ollama)

pub mod client;
pub mod error;
pub mod types;

pub use client::{normalize_model_name, OllamaClient};
pub use error::OllamaError;

use async_trait::async_trait;

use crate::models::ModelInfo;

/// Interface to the model-serving runtime
///
/// The chat session and the HTTP handlers hold this as a trait object so
/// tests can substitute fakes for the real HTTP client.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// List installed models
    async fn list_models(&self) -> Result<Vec<ModelInfo>, OllamaError>;

    /// Generate a complete response for a prompt
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        system: Option<&str>,
    ) -> Result<String, OllamaError>;

    /// Connectivity probe; returns the runtime version
    async fn healthcheck(&self) -> Result<String, OllamaError>;
}
