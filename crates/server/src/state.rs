use std::sync::{Arc, Mutex};

use sqlx::PgPool;

use docchat_core::Config;
use docchat_ingest::embedding::{Embedder, QueryCache};
use docchat_llm::LlmProvider;

use crate::auth::AuthClient;

/// Shared application state. Collaborators that depend on external
/// configuration are optional; endpoints that need a missing one
/// answer 503 instead of the server refusing to start.
pub struct AppState {
    pub config: Config,
    pub pg_pool: Option<PgPool>,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub auth: Option<AuthClient>,
    pub query_cache: Mutex<QueryCache>,
}
