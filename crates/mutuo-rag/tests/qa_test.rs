//! End-to-end QA pipeline test against a mock model API.

use axum::{routing::post, Json, Router};
use mutuo_llm::{ChatClient, OpenAiConfig};
use mutuo_rag::{IndexedChunk, QaPipeline, RagError, VectorIndex};
use mutuo_types::SourceRef;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Mock model API: embeds any question as [1, 0] and synthesizes an answer
/// that echoes the stuffed document context.
async fn spawn_mock() -> String {
    let router = Router::new()
        .route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                let count = body["input"].as_array().unwrap().len();
                let data: Vec<Value> = (0..count)
                    .map(|i| json!({"index": i, "embedding": [1.0, 0.0]}))
                    .collect();
                Json(json!({"data": data}))
            }),
        )
        .route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let system = body["messages"][0]["content"].as_str().unwrap();
                assert!(system.contains("mutui"));
                let prompt = body["messages"][1]["content"].as_str().unwrap();
                Json(json!({
                    "choices": [{"message": {
                        "role": "assistant",
                        "content": format!("CONTESTO >>> {}", prompt)
                    }}]
                }))
            }),
        );

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("should bind mock listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn chunk(text: &str, embedding: Vec<f32>, source: SourceRef) -> IndexedChunk {
    IndexedChunk {
        text: text.to_string(),
        embedding,
        source,
    }
}

#[tokio::test]
async fn answer_stuffs_nearest_chunks_and_reports_sources() {
    let base = spawn_mock().await;
    let llm = ChatClient::new(OpenAiConfig::new("k").with_api_base(base));

    let index = VectorIndex::from_chunks(vec![
        chunk(
            "Il tasso fisso resta invariato per tutta la durata del mutuo.",
            vec![0.95, 0.05],
            SourceRef::new("docs/tassi.pdf").with_page(2),
        ),
        chunk(
            "Ricetta della carbonara.",
            vec![0.0, 1.0],
            SourceRef::new("docs/cucina.pdf").with_page(9),
        ),
    ]);

    let pipeline = QaPipeline::new(index, llm).with_top_k(1);
    let result = pipeline
        .answer("Cos'è il tasso fisso?")
        .await
        .expect("answer should succeed");

    // Only the nearest chunk is stuffed; the unrelated one stays out.
    assert!(result.answer.contains("tasso fisso resta invariato"));
    assert!(!result.answer.contains("carbonara"));
    assert!(result.answer.contains("Domanda: Cos'è il tasso fisso?"));

    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].source, "docs/tassi.pdf");
    assert_eq!(result.sources[0].page, Some(2));
}

#[tokio::test]
async fn empty_index_is_rejected_before_any_model_call() {
    // api_base points at nothing routable; reaching the network would fail,
    // proving the guard fires first.
    let llm = ChatClient::new(
        OpenAiConfig::new("k").with_api_base("http://127.0.0.1:1".to_string()),
    );
    let pipeline = QaPipeline::new(VectorIndex::from_chunks(vec![]), llm);

    let err = pipeline.answer("Domanda?").await.unwrap_err();
    assert!(matches!(err, RagError::EmptyIndex));
}
