//! OpenAI client tests against an in-process HTTP server.
//!
//! The server mimics `POST /v1/embeddings` so the client is exercised over a
//! real socket without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use cine_embeddings::{build_model, EmbeddingConfig, EmbeddingError, Provider};
use serde_json::{json, Value};

#[derive(Clone)]
struct MockState {
    dimension: usize,
    calls: Arc<AtomicUsize>,
}

async fn embeddings(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer sk-test")
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        );
    }

    let input = body["input"].as_str().unwrap_or_default();
    let model = body["model"].as_str().unwrap_or_default();
    // First component encodes the input length so tests can tell requests apart
    let mut embedding = vec![0.0f32; state.dimension];
    embedding[0] = input.len() as f32;

    (
        StatusCode::OK,
        Json(json!({
            "object": "list",
            "data": [{"object": "embedding", "index": 0, "embedding": embedding}],
            "model": model,
        })),
    )
}

async fn spawn_server(dimension: usize) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        dimension,
        calls: Arc::clone(&calls),
    };
    let app = Router::new()
        .route("/v1/embeddings", post(embeddings))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });

    (format!("http://{}/v1", addr), calls)
}

fn config(endpoint: String, api_key: &str, dimension: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: Provider::OpenAi,
        api_key: Some(api_key.to_string()),
        endpoint: Some(endpoint),
        dimension,
        ..EmbeddingConfig::default()
    }
}

#[tokio::test]
async fn test_embed_returns_vector_of_configured_dimension() {
    let (endpoint, calls) = spawn_server(1536).await;
    let model = build_model(&config(endpoint, "sk-test", 1536)).unwrap();

    let vector = model.embed("space opera").await.unwrap();
    assert_eq!(vector.len(), 1536);
    approx::assert_relative_eq!(vector[0], 11.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_batch_issues_one_request_per_text() {
    let (endpoint, calls) = spawn_server(4).await;
    let model = build_model(&config(endpoint, "sk-test", 4)).unwrap();

    let vectors = model.embed_batch(&["a", "bb", "ccc"]).await.unwrap();
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[2][0], 3.0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_auth_failure_surfaces_status() {
    let (endpoint, _calls) = spawn_server(4).await;
    let model = build_model(&config(endpoint, "sk-wrong", 4)).unwrap();

    let err = model.embed("space opera").await.unwrap_err();
    match err {
        EmbeddingError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Incorrect API key"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dimension_mismatch_is_rejected() {
    let (endpoint, _calls) = spawn_server(8).await;
    let model = build_model(&config(endpoint, "sk-test", 1536)).unwrap();

    let err = model.embed("space opera").await.unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 1536,
            actual: 8
        }
    ));
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let (endpoint, calls) = spawn_server(4).await;
    let model = build_model(&config(endpoint, "sk-test", 4)).unwrap();

    let err = model.embed_batch(&["ok", "  ", "never sent"]).await.unwrap_err();
    assert!(matches!(err, EmbeddingError::EmptyInput));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let model = build_model(&config(format!("http://{}/v1", addr), "sk-test", 4)).unwrap();
    let err = model.embed("space opera").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Network { .. }));
}
