//! Integration tests for the HTTP API's JSON contract.
//!
//! Since `docchat-server` is a binary crate (no lib.rs), we test the wire
//! contract by defining mirror types and validating serialization
//! roundtrips. Endpoint behavior against live collaborators (Postgres,
//! embedding and chat APIs) is exercised by the in-crate unit tests and by
//! deployment smoke tests, not here.

use serde::{Deserialize, Serialize};

// ── Mirror types matching the wire contract ───────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct UploadResponse {
    document_id: String,
    filename: String,
    chunk_count: usize,
    file_size: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(default = "default_stream")]
    stream: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchResult {
    chunk_id: String,
    document_id: String,
    filename: String,
    content: String,
    chunk_index: i32,
    similarity: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    postgres_configured: bool,
    auth_configured: bool,
    embedding_provider: String,
    embedding_configured: bool,
    chat_provider: String,
    chat_configured: bool,
}

// ── Contract tests ────────────────────────────────────────────────

#[test]
fn upload_response_shape() {
    let json = r#"{
        "document_id": "4e1c2b52-78e4-4f23-9c1b-9b2f1e6f0c11",
        "filename": "paper.pdf",
        "chunk_count": 12,
        "file_size": 48213
    }"#;
    let resp: UploadResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.filename, "paper.pdf");
    assert_eq!(resp.chunk_count, 12);
}

#[test]
fn chat_request_minimal_form_defaults_to_streaming() {
    let json = r#"{"messages":[{"role":"user","content":"What is this paper about?"}]}"#;
    let req: ChatRequest = serde_json::from_str(json).unwrap();
    assert!(req.stream);
    assert_eq!(req.messages[0].role, "user");
}

#[test]
fn chat_request_accepts_conversation_history() {
    let json = r#"{
        "messages": [
            {"role": "user", "content": "Summarize the paper."},
            {"role": "assistant", "content": "The paper is about chunking."},
            {"role": "user", "content": "What chunk size does it use?"}
        ],
        "stream": false
    }"#;
    let req: ChatRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.messages.len(), 3);
    assert!(!req.stream);
}

#[test]
fn search_request_limit_defaults_to_ten() {
    let req: SearchRequest = serde_json::from_str(r#"{"query":"overlap"}"#).unwrap();
    assert_eq!(req.limit, 10);
}

#[test]
fn search_result_roundtrip() {
    let result = SearchResult {
        chunk_id: "00000000-0000-0000-0000-000000000000".into(),
        document_id: "00000000-0000-0000-0000-000000000001".into(),
        filename: "paper.pdf".into(),
        content: "The overlap rewind preserves cross-boundary context.".into(),
        chunk_index: 3,
        similarity: 0.82,
    };
    let json = serde_json::to_string(&result).unwrap();
    let back: SearchResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.chunk_index, 3);
    assert!((back.similarity - 0.82).abs() < f64::EPSILON);
}

#[test]
fn health_response_shape() {
    let json = r#"{
        "status": "ok",
        "version": "0.1.0",
        "postgres_configured": false,
        "auth_configured": false,
        "embedding_provider": "huggingface",
        "embedding_configured": false,
        "chat_provider": "groq",
        "chat_configured": false
    }"#;
    let resp: HealthResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.status, "ok");
    assert_eq!(resp.embedding_provider, "huggingface");
}
