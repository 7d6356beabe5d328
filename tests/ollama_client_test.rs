//! Ollama client against a mock HTTP server

use httpmock::prelude::*;
use serde_json::json;

use ncbi_agent::models::ModelInfo;
use ncbi_agent::ollama::{ModelService, OllamaClient, OllamaError};

#[tokio::test]
async fn test_list_models_maps_tag_entries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "llama3.2:latest", "size": 2019393189i64, "modified_at": "2025-05-01T10:00:00Z"},
                    {"name": "mistral:latest", "size": 4113301824i64, "modified_at": "2025-04-02T08:30:00Z"}
                ]
            }));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    let models = client.list_models().await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        models[0],
        ModelInfo {
            name: "llama3.2:latest".to_string(),
            size: 2019393189,
            modified: "2025-05-01T10:00:00Z".to_string(),
        }
    );
    assert_eq!(models.len(), 2);
}

#[tokio::test]
async fn test_list_models_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(500).body("internal error");
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    let err = client.list_models().await.unwrap_err();

    match err {
        OllamaError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_normalizes_model_and_disables_streaming() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model":"llama3.2:latest","stream":false}"#);
            then.status(200)
                .json_body(json!({"response": "Hello there!", "done": true}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    let response = client
        .generate("say hello", "llama3.2", Some("You are terse."))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response, "Hello there!");
}

#[tokio::test]
async fn test_generate_passes_system_prompt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"system":"You are a helpful biomedical research assistant."}"#);
            then.status(200).json_body(json!({"response": "ok"}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    client
        .generate(
            "hi",
            "llama3.2",
            Some("You are a helpful biomedical research assistant."),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_missing_model_is_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(404)
                .json_body(json!({"error": "model 'nope:latest' not found"}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    let err = client.generate("hi", "nope", None).await.unwrap_err();

    match err {
        OllamaError::Http { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_healthcheck_returns_version() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({"version": "0.6.2"}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), 5).unwrap();
    assert_eq!(client.healthcheck().await.unwrap(), "0.6.2");
}
