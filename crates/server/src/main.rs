mod api;
mod auth;
mod db;
mod router;
mod state;
mod vector_store;

use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use docchat_core::Config;
use docchat_ingest::embedding::{create_embedder, QueryCache};
use docchat_llm::create_provider;

use crate::auth::AuthClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    docchat_core::config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let pg_pool = db::init_pg_pool(&config.postgres).await;

    let embedder = match create_embedder(&config.embedding) {
        Ok(embedder) => {
            info!(
                "Embedding backend ready (provider: {}, {} dims)",
                config.embedding.provider,
                embedder.dimensions()
            );
            Some(embedder)
        }
        Err(e) => {
            warn!("Embedding backend not available: {} — upload/search/chat disabled", e);
            None
        }
    };

    let llm = match create_provider(&config.chat) {
        Ok(provider) => {
            info!("Chat backend ready (provider: {})", config.chat.provider);
            Some(provider)
        }
        Err(e) => {
            warn!("Chat backend not available: {} — POST /chat disabled", e);
            None
        }
    };

    let auth = AuthClient::from_config(&config.auth);
    if auth.is_none() {
        warn!("Auth provider not configured — authenticated endpoints disabled");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let query_cache = Mutex::new(QueryCache::new(config.embedding.query_cache_size));

    let state = Arc::new(AppState {
        config,
        pg_pool,
        embedder,
        llm,
        auth,
        query_cache,
    });

    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
