//! Retrieval-augmented chat endpoint.
//!
//! The latest message is embedded and matched against the caller's stored
//! chunks; the winning chunks become the system-prompt context and the
//! conversation is forwarded to the chat provider. Streamed answers relay
//! through a bounded channel: a spawned producer task forwards provider
//! token deltas, and the response body ends when the sender drops.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use docchat_llm::{Message, Role};

use crate::state::AppState;
use crate::vector_store;

use super::{authenticate, check_retrieval_deps, embed_query};

// ── Request/Response types ────────────────────────

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    /// Conversation so far; the last message is treated as the question.
    #[schema(value_type = Vec<Object>)]
    pub messages: Vec<Message>,
    /// Stream the answer as plain text (default) or return one JSON body.
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChatAnswer {
    pub answer: String,
    #[schema(value_type = Vec<Object>)]
    pub sources: Vec<vector_store::SearchResult>,
}

// ── Prompt ────────────────────────────────────────

fn build_system_prompt(context: &str) -> String {
    format!(
        "You are a helpful assistant. Answer the user's question based ONLY on \
         the provided context. If the answer is not in the context, say so politely.\
         \n\nContext:\n{context}"
    )
}

// ── POST /chat ────────────────────────────────────

/// Chat over the user's documents
///
/// Retrieves the most relevant chunks for the latest message and forwards
/// them with the conversation to the chat provider. Streams `text/plain`
/// token deltas unless `stream: false` is requested.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant answer (streamed text or JSON)", body = ChatAnswer),
        (status = 401, description = "Unauthorized", body = String),
        (status = 502, description = "Chat provider failure", body = String),
        (status = 503, description = "Chat service unavailable", body = String)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Result<Response, (StatusCode, String)> {
    let user = authenticate(&state, &headers).await?;
    let (pool, embedder) = check_retrieval_deps(&state)?;
    let llm = state.llm.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Chat provider not configured".to_string(),
    ))?;

    let question = req
        .messages
        .last()
        .map(|m| m.content.clone())
        .ok_or((StatusCode::BAD_REQUEST, "No messages provided".to_string()))?;

    let query_embedding = embed_query(&state, embedder, &question).await?;

    let retrieval = &state.config.retrieval;
    let matches = vector_store::search(
        pool,
        query_embedding,
        user.id,
        retrieval.match_threshold,
        retrieval.match_count,
    )
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search failed: {e}"),
        )
    })?;

    let context = matches
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut messages = vec![Message {
        role: Role::System,
        content: build_system_prompt(&context),
    }];
    // The context prompt is authoritative; client-supplied system
    // messages are dropped.
    messages.extend(req.messages.into_iter().filter(|m| m.role != Role::System));

    let chat_config = &state.config.chat;

    if !req.stream {
        let answer = llm
            .complete(messages, chat_config.temperature, chat_config.max_tokens)
            .await
            .map_err(|e| {
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Chat completion failed: {e}"),
                )
            })?;
        return Ok(Json(ChatAnswer {
            answer,
            sources: matches,
        })
        .into_response());
    }

    // Open the upstream stream before answering so request-level provider
    // failures surface as a clean error instead of a truncated body.
    let mut deltas = llm
        .stream(messages, chat_config.temperature, chat_config.max_tokens)
        .await
        .map_err(|e| {
            (
                StatusCode::BAD_GATEWAY,
                format!("Chat completion failed: {e}"),
            )
        })?;

    let (tx, rx) = tokio::sync::mpsc::channel::<bytes::Bytes>(32);

    tokio::spawn(async move {
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) => {
                    // Send fails when the client disconnects.
                    if tx.send(bytes::Bytes::from(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("upstream chat stream failed: {e}");
                    break;
                }
            }
        }
        // Sender drops here, ending the response body.
    });

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_the_context() {
        let prompt = build_system_prompt("Chunk one.\n\nChunk two.");
        assert!(prompt.contains("based ONLY on"));
        assert!(prompt.ends_with("Context:\nChunk one.\n\nChunk two."));
    }

    #[test]
    fn system_prompt_with_no_matches_is_still_well_formed() {
        let prompt = build_system_prompt("");
        assert!(prompt.ends_with("Context:\n"));
    }

    #[test]
    fn stream_defaults_to_true() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(req.stream);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn stream_can_be_disabled() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}],"stream":false}"#)
                .unwrap();
        assert!(!req.stream);
    }
}
