//! Conversation-history client tests against a local mock ConvAI API.

use axum::extract::{Path, Query};
use axum::{routing::get, Json, Router};
use mutuo_convai::{ConvaiClient, ConvaiConfig, ConvaiError};
use mutuo_types::Role;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("should bind mock listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base: String) -> ConvaiClient {
    ConvaiClient::new(ConvaiConfig::new("xi-test-key", "agent-1").with_api_base(base))
}

#[tokio::test]
async fn list_failure_is_an_api_error_with_status() {
    let router = Router::new().route(
        "/v1/convai/conversations",
        get(|| async { (axum::http::StatusCode::NOT_FOUND, "not found") }),
    );
    let base = spawn_mock(router).await;

    let err = client_for(base)
        .latest_conversation_id()
        .await
        .expect_err("404 should surface as an error");
    match err {
        ConvaiError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_conversation_list_is_none_not_error() {
    let router = Router::new().route(
        "/v1/convai/conversations",
        get(|| async { Json(json!({"conversations": []})) }),
    );
    let base = spawn_mock(router).await;

    let id = client_for(base)
        .latest_conversation_id()
        .await
        .expect("empty list is not an error");
    assert_eq!(id, None);
}

#[tokio::test]
async fn latest_conversation_fetches_list_then_details() {
    let router = Router::new()
        .route(
            "/v1/convai/conversations",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                // The list call must be scoped to the agent with page_size 1.
                assert_eq!(params.get("agent_id").map(String::as_str), Some("agent-1"));
                assert_eq!(params.get("page_size").map(String::as_str), Some("1"));
                Json(json!({
                    "conversations": [{"conversation_id": "conv_42", "status": "done"}]
                }))
            }),
        )
        .route(
            "/v1/convai/conversations/{conversationId}",
            get(|Path(id): Path<String>| async move {
                assert_eq!(id, "conv_42");
                Json(json!({
                    "conversation_id": "conv_42",
                    "transcript": [
                        {"role": "agent", "message": "Buongiorno", "time_in_call_secs": 0.0},
                        {"role": "user", "message": "Salve", "time_in_call_secs": 2.5}
                    ]
                }))
            }),
        );
    let base = spawn_mock(router).await;

    let details = client_for(base)
        .latest_conversation()
        .await
        .expect("fetch should succeed")
        .expect("a conversation exists");
    assert_eq!(details.conversation_id, "conv_42");
    assert_eq!(details.transcript.len(), 2);
    assert_eq!(details.transcript[1].role, Role::User);
    assert_eq!(details.transcript[1].message, "Salve");
    assert_eq!(details.transcript[1].time_in_call_secs, 2.5);
}

#[tokio::test]
async fn detail_failure_is_an_api_error_with_status() {
    let router = Router::new().route(
        "/v1/convai/conversations/{conversationId}",
        get(|| async {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                Json::<Value>(json!({"detail": "invalid api key"})),
            )
        }),
    );
    let base = spawn_mock(router).await;

    let err = client_for(base)
        .conversation_details("conv_42")
        .await
        .expect_err("401 should surface as an error");
    match err {
        ConvaiError::Api { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
