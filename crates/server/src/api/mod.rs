//! Domain-focused API endpoint modules.
//!
//! Each sub-module owns a single responsibility area. Shared guards
//! (auth, dependency checks, query embedding) live here in mod.rs.

pub mod chat;
pub mod doc;
pub mod documents;
pub mod health;

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};

use docchat_ingest::embedding::Embedder;

use crate::auth::{bearer_token, AuthError, AuthUser};
use crate::state::AppState;

pub use chat::chat;
pub use documents::{delete_document, list_documents, search, upload};
pub use health::health;

// ── Auth guard ───────────────────────────────────────────────────

/// Resolve the caller from the Authorization header via the hosted auth
/// provider. 503 when auth is not configured, 401 on a missing or
/// rejected token.
pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthUser, (StatusCode, String)> {
    let auth = state.auth.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Auth provider not configured".to_string(),
    ))?;

    let token =
        bearer_token(headers).ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

    match auth.verify_token(token).await {
        Ok(user) => Ok(user),
        Err(AuthError::Unauthorized) => {
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
        Err(e) => Err((StatusCode::BAD_GATEWAY, format!("Auth check failed: {e}"))),
    }
}

// ── Dependency checks ────────────────────────────────────────────

/// Storage and embedding are both needed for upload, search, and chat
/// retrieval; answer 503 when either is missing.
pub(crate) fn check_retrieval_deps(
    state: &AppState,
) -> Result<(&sqlx::PgPool, &Arc<dyn Embedder>), (StatusCode, String)> {
    let pool = state.pg_pool.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "PostgreSQL not configured".to_string(),
    ))?;
    let embedder = state.embedder.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Embedding provider not configured".to_string(),
    ))?;
    Ok((pool, embedder))
}

// ── Query embedding ──────────────────────────────────────────────

/// Embed a query text, going through the LRU cache so repeated questions
/// skip the embedding API round-trip.
pub(crate) async fn embed_query(
    state: &AppState,
    embedder: &Arc<dyn Embedder>,
    text: &str,
) -> Result<Vec<f32>, (StatusCode, String)> {
    if let Ok(mut cache) = state.query_cache.lock() {
        if let Some(hit) = cache.get(text) {
            tracing::debug!("query embedding cache hit (rate {:.2})", cache.hit_rate());
            return Ok(hit);
        }
    }

    let embeddings = embedder.embed_batch(&[text]).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Embedding failed: {e}"),
        )
    })?;

    let embedding = embeddings.into_iter().next().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "No embedding returned".to_string(),
    ))?;

    if let Ok(mut cache) = state.query_cache.lock() {
        cache.put(text, embedding.clone());
    }
    Ok(embedding)
}
