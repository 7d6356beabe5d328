//! Wire types for the Ollama HTTP API

use serde::{Deserialize, Serialize};

/// `GET /api/tags` response
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

/// One installed model as reported by `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    pub name: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub modified_at: String,
}

/// `POST /api/generate` request body (non-streaming)
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub stream: bool,
}

/// `POST /api/generate` response body
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// `GET /api/version` response body
#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}
