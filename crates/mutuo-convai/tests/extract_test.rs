//! Extraction pipeline tests with a counting mock chat endpoint.

use axum::{routing::post, Extension, Json, Router};
use mutuo_convai::{extract_contacts, ExtractionOutcome};
use mutuo_llm::{ChatClient, OpenAiConfig};
use mutuo_types::{Role, TranscriptTurn};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Spawns a mock chat endpoint that counts how many requests it serves.
async fn spawn_counting_mock() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/v1/chat/completions",
            post(
                |Extension(hits): Extension<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    // Echo the prompt back so tests can assert on what the
                    // model was actually sent.
                    let prompt = body["messages"][0]["content"].as_str().unwrap().to_string();
                    Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": prompt}}]
                    }))
                },
            ),
        )
        .layer(Extension(hits.clone()));

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("should bind mock listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn turn(role: Role, message: &str) -> TranscriptTurn {
    TranscriptTurn::new(role, message, 0.0)
}

#[tokio::test]
async fn agent_only_transcript_short_circuits_without_model_call() {
    let (base, hits) = spawn_counting_mock().await;
    let llm = ChatClient::new(OpenAiConfig::new("k").with_api_base(base));

    let transcript = vec![
        turn(Role::Agent, "Buongiorno"),
        turn(Role::Agent, "grazie"),
    ];
    let outcome = extract_contacts(&llm, &transcript)
        .await
        .expect("short-circuit is not an error");

    assert_eq!(outcome, ExtractionOutcome::NoUserMessages);
    assert_eq!(hits.load(Ordering::SeqCst), 0, "model must never be invoked");
}

#[tokio::test]
async fn whitespace_only_user_turns_also_short_circuit() {
    let (base, hits) = spawn_counting_mock().await;
    let llm = ChatClient::new(OpenAiConfig::new("k").with_api_base(base));

    let transcript = vec![turn(Role::User, "   "), turn(Role::User, "")];
    let outcome = extract_contacts(&llm, &transcript).await.unwrap();

    assert_eq!(outcome, ExtractionOutcome::NoUserMessages);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn extraction_sends_user_turns_inside_the_template() {
    let (base, hits) = spawn_counting_mock().await;
    let llm = ChatClient::new(OpenAiConfig::new("k").with_api_base(base));

    let transcript = vec![
        turn(Role::User, "la mia email è mario chiocciola test punto it"),
        turn(Role::Agent, "grazie"),
    ];
    let outcome = extract_contacts(&llm, &transcript).await.unwrap();

    let prompt = match outcome {
        ExtractionOutcome::Contacts(text) => text,
        ExtractionOutcome::NoUserMessages => panic!("transcript has a user turn"),
    };
    // The mock echoes the prompt: the transcript body must be present exactly
    // once, with no agent turns, and the template rules must surround it.
    assert!(prompt.contains("la mia email è mario chiocciola test punto it"));
    assert!(!prompt.contains("grazie"));
    assert!(prompt.contains("Email: <indirizzo email>"));
    assert!(prompt.contains("Non trovato"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
