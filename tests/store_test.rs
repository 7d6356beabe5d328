//! Persistence layer and server tests against a PostgreSQL container
//!
//! These tests need a Docker daemon, so they are all #[ignore]-gated.
//! Run them with: cargo test --test store_test -- --ignored

mod common;

use serde_json::json;
use testcontainers::clients::Cli;

use ncbi_agent::models::{AgentStatus, ChatFrame, QueryStatus};
use ncbi_agent::routes::configure_routes;
use ncbi_agent::settings::Parameter;
use ncbi_agent::state::AppState;
use ncbi_agent::store::{Error, Store, StoreConfig};

// Note: This keeps _docker and _container alive for the duration of the test
macro_rules! setup_test {
    ($docker:ident, $container:ident, $store:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());

        // Give PostgreSQL a moment to finish its restart after initdb
        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        let host_port = $container.get_host_port_ipv4(common::POSTGRES_PORT);
        let connection_string = common::build_connection_string("127.0.0.1", host_port);
        let config = StoreConfig::from_connection_string(&connection_string).unwrap();
        let $store = Store::connect(config).await.unwrap();
        $store.ensure_schema().await.unwrap();
    };
}

// ============================================================================
// Schema and configuration rows
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_ensure_schema_is_idempotent() {
    setup_test!(_docker, _container, store);

    // Second run must be a no-op, not an error
    store.ensure_schema().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_parameter_round_trip() {
    setup_test!(_docker, _container, store);

    assert_eq!(store.get_parameter("ollama_host").await.unwrap(), None);

    store
        .set_parameter("ollama_host", "http://ollama:11434")
        .await
        .unwrap();
    assert_eq!(
        store.get_parameter("ollama_host").await.unwrap(),
        Some("http://ollama:11434".to_string())
    );

    // Upsert overwrites in place
    store
        .set_parameter("ollama_host", "http://other:11434")
        .await
        .unwrap();
    assert_eq!(
        store.get_parameter("ollama_host").await.unwrap(),
        Some("http://other:11434".to_string())
    );
}

#[tokio::test]
#[ignore]
async fn test_create_parameter_does_not_overwrite() {
    setup_test!(_docker, _container, store);

    let created = store
        .create_parameter("max_results_per_query", "20", "Max results")
        .await
        .unwrap();
    assert!(created);

    // A second create leaves the existing value alone
    let created = store
        .create_parameter("max_results_per_query", "50", "Max results")
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(
        store.get_parameter("max_results_per_query").await.unwrap(),
        Some("20".to_string())
    );
}

#[tokio::test]
#[ignore]
async fn test_seeded_defaults_list_every_parameter() {
    setup_test!(_docker, _container, store);

    ncbi_agent::commands::init_config(&store).await.unwrap();

    let rows = store.list_parameters().await.unwrap();
    assert_eq!(rows.len(), Parameter::ALL.len());
    for parameter in Parameter::ALL {
        assert!(rows.iter().any(|r| r.parameter_name == parameter.as_str()));
    }
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_user_token_lookup() {
    setup_test!(_docker, _container, store);

    let user = store
        .create_user("alice", "token-abc", true)
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.is_staff);

    let found = store.find_user_by_token("token-abc").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    assert!(store.find_user_by_token("wrong").await.unwrap().is_none());
}

// ============================================================================
// Queries and results
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_query_lifecycle() {
    setup_test!(_docker, _container, store);

    let user = store.create_user("bob", "token-bob", false).await.unwrap();
    let query = store
        .create_query(user.id, "BRCA1 variants", "natural_language")
        .await
        .unwrap();
    assert_eq!(query.status, QueryStatus::Processing);
    assert!(query.execution_time.is_none());

    store
        .finish_query(query.id, QueryStatus::Completed, 1.25)
        .await
        .unwrap();

    let queries = store.list_queries(10).await.unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].status, QueryStatus::Completed);
    assert_eq!(queries[0].execution_time, Some(1.25));
}

#[tokio::test]
#[ignore]
async fn test_finish_unknown_query_is_not_found() {
    setup_test!(_docker, _container, store);

    let err = store
        .finish_query(9999, QueryStatus::Completed, 0.5)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_results_ordered_by_relevance() {
    setup_test!(_docker, _container, store);

    let user = store.create_user("carol", "token-c", false).await.unwrap();
    let query = store
        .create_query(user.id, "p53 pathway", "natural_language")
        .await
        .unwrap();
    let agent = store
        .create_agent("PubMed Agent", "literature", AgentStatus::Online)
        .await
        .unwrap();

    for (database, score) in [("pubmed", 0.4), ("gene", 0.9), ("protein", 0.7)] {
        store
            .add_result(query.id, agent.id, database, &json!({"db": database}), score)
            .await
            .unwrap();
    }

    let results = store.results_for_query(query.id).await.unwrap();
    let scores: Vec<f64> = results.iter().map(|r| r.relevance_score).collect();
    assert_eq!(scores, vec![0.9, 0.7, 0.4]);
    assert_eq!(results[0].source_database, "gene");
}

#[tokio::test]
#[ignore]
async fn test_assign_agent_tolerates_duplicates() {
    setup_test!(_docker, _container, store);

    let user = store.create_user("dave", "token-d", false).await.unwrap();
    let query = store
        .create_query(user.id, "gene expression", "natural_language")
        .await
        .unwrap();
    let agent = store
        .create_agent("Gene Agent", "genomics", AgentStatus::Online)
        .await
        .unwrap();

    store.assign_agent(query.id, agent.id).await.unwrap();
    store.assign_agent(query.id, agent.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_agent_is_not_found() {
    setup_test!(_docker, _container, store);

    let err = store.get_agent(12345).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// ============================================================================
// Admin API behavior that needs real rows
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_staff_delete_is_rejected_and_row_survives() {
    setup_test!(_docker, _container, store);

    store.create_user("admin", "token-admin", true).await.unwrap();
    store
        .set_parameter("ollama_host", "http://gpu-box:11434")
        .await
        .unwrap();

    let routes = configure_routes(AppState::new(store.clone()));
    let response = warp::test::request()
        .method("DELETE")
        .path("/api/admin/config/ollama_host")
        .header("authorization", "Bearer token-admin")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["detail"], "configuration parameters cannot be deleted");

    assert_eq!(
        store.get_parameter("ollama_host").await.unwrap(),
        Some("http://gpu-box:11434".to_string())
    );
}

// ============================================================================
// Websocket handshake behavior (no Ollama runtime present)
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_unauthenticated_websocket_is_closed_silently() {
    setup_test!(_docker, _container, store);

    let routes = configure_routes(AppState::new(store));

    let mut client = warp::test::ws()
        .path("/ws/chat")
        .handshake(routes)
        .await
        .expect("handshake");

    // The server closes without sending any frame
    client.recv_closed().await.expect("expected close");
}

#[tokio::test]
#[ignore]
async fn test_authenticated_chat_gets_receipt_and_result() {
    setup_test!(_docker, _container, store);

    store
        .create_user("erin", "token-erin", false)
        .await
        .unwrap();
    let routes = configure_routes(AppState::new(store));

    let mut client = warp::test::ws()
        .path("/ws/chat?token=token-erin")
        .handshake(routes)
        .await
        .expect("handshake");

    client
        .send_text(r#"{"message":"what is BRCA1?"}"#)
        .await;

    let first = client.recv().await.expect("receipt frame");
    let first: ChatFrame = serde_json::from_str(first.to_str().unwrap()).unwrap();
    match first {
        ChatFrame::QueryReceived { message, .. } => assert_eq!(message, "what is BRCA1?"),
        other => panic!("expected query_received, got {:?}", other),
    }

    // No Ollama runtime is listening, so the result reports a failure
    let second = client.recv().await.expect("result frame");
    let second: ChatFrame = serde_json::from_str(second.to_str().unwrap()).unwrap();
    match second {
        ChatFrame::ProcessingUpdate { success, .. } => assert!(!success),
        other => panic!("expected processing_update, got {:?}", other),
    }
}
