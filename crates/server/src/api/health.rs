//! Health endpoint: server liveness and collaborator configuration.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub postgres_configured: bool,
    pub auth_configured: bool,
    pub embedding_provider: String,
    pub embedding_configured: bool,
    pub chat_provider: String,
    pub chat_configured: bool,
}

/// Server health and configured collaborators
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        postgres_configured: state.pg_pool.is_some(),
        auth_configured: state.auth.is_some(),
        embedding_provider: state.config.embedding.provider.clone(),
        embedding_configured: state.embedder.is_some(),
        chat_provider: state.config.chat.provider.clone(),
        chat_configured: state.llm.is_some(),
    })
}
