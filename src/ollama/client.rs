//! Ollama client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::ModelInfo;
use crate::ollama::error::OllamaError;
use crate::ollama::types::{GenerateRequest, GenerateResponse, TagsResponse, VersionResponse};
use crate::ollama::ModelService;

/// Ensure a model name carries a tag, defaulting to `:latest`
///
/// Configuration rows store bare names like `llama3.2`; the runtime reports
/// and expects tagged names like `llama3.2:latest`.
pub fn normalize_model_name(name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{}:latest", name)
    }
}

/// Client for a local Ollama runtime
pub struct OllamaClient {
    http_client: Client,
    host: String,
}

impl OllamaClient {
    /// Create a new client against the given host
    ///
    /// # Arguments
    ///
    /// * `host` - Base URL of the runtime (e.g. `http://localhost:11434`)
    /// * `timeout_secs` - Per-request timeout, from the `ollama_timeout`
    ///   configuration parameter
    pub fn new(host: impl Into<String>, timeout_secs: u64) -> Result<Self, OllamaError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OllamaError::Unreachable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            host: host.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(OllamaError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ModelService for OllamaClient {
    /// List installed models via `GET /api/tags`
    async fn list_models(&self) -> Result<Vec<ModelInfo>, OllamaError> {
        let response = self.http_client.get(self.url("/api/tags")).send().await?;
        let response = Self::check_status(response).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Serialization(e.to_string()))?;

        Ok(tags
            .models
            .into_iter()
            .map(|entry| ModelInfo {
                name: entry.name,
                size: entry.size,
                modified: entry.modified_at,
            })
            .collect())
    }

    /// One-shot text generation via `POST /api/generate`
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        system: Option<&str>,
    ) -> Result<String, OllamaError> {
        let request = GenerateRequest {
            model: normalize_model_name(model),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            stream: false,
        };

        let response = self
            .http_client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Serialization(e.to_string()))?;
        Ok(generated.response)
    }

    /// Runtime version via `GET /api/version`, used as a connectivity probe
    async fn healthcheck(&self) -> Result<String, OllamaError> {
        let response = self
            .http_client
            .get(self.url("/api/version"))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let version: VersionResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Serialization(e.to_string()))?;
        Ok(version.version)
    }
}
