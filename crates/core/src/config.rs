use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f32(key: &str, default: f32) -> f32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

/// All runtime configuration, read once at startup. Backend selection
/// (embedding provider, chat provider) lives here and is handed to the
/// respective factories — never re-read from the environment at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub auth: AuthConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            postgres: PostgresConfig::from_env(),
            auth: AuthConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            chat: ChatConfig::from_env(),
            chunking: ChunkingConfig::from_env(),
            retrieval: RetrievalConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:    {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  postgres:  host={}, db={}, configured={}",
            self.postgres.host,
            self.postgres.database,
            self.postgres.is_configured()
        );
        tracing::info!(
            "  auth:      url={}, configured={}",
            self.auth.url.as_deref().unwrap_or("(none)"),
            self.auth.is_configured()
        );
        tracing::info!(
            "  embedding: provider={}, dimensions={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
        tracing::info!("  chat:      provider={}", self.chat.provider);
        tracing::info!(
            "  chunking:  chunk_size={}, overlap={}",
            self.chunking.chunk_size,
            self.chunking.overlap
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 3001),
            cors_origin: env_or("CORS_ORIGIN", "*"),
        }
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl PostgresConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("PG_HOST", "localhost"),
            port: env_u16("PG_PORT", 5432),
            database: env_or("PG_DATABASE", "docchat"),
            username: env_opt("PG_USERNAME"),
            password: env_opt("PG_PASSWORD"),
            ssl_mode: env_or("PG_SSL_MODE", "prefer"),
            max_connections: env_u32("PG_MAX_CONNECTIONS", 10),
        }
    }

    pub fn connection_string(&self) -> String {
        let user = self.username.as_deref().unwrap_or("postgres");
        let pass = self.password.as_deref().unwrap_or("");
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            user, pass, self.host, self.port, self.database, self.ssl_mode
        )
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

// ── Hosted auth provider ──────────────────────────────────────

/// Authentication is delegated to a hosted provider (GoTrue-style API).
/// We only verify bearer tokens against it; no session state of our own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl AuthConfig {
    fn from_env() -> Self {
        Self {
            url: env_opt("AUTH_URL"),
            anon_key: env_opt("AUTH_ANON_KEY"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "huggingface", "openai", or "mock"
    pub provider: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_model: String,
    pub huggingface_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub dimensions: usize,
    pub query_cache_size: usize,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        let provider = env_or("EMBEDDING_PROVIDER", "huggingface");
        // all-MiniLM-L6-v2 is 384-dim; text-embedding-3-small is 1536-dim.
        let default_dims = if provider == "openai" { 1536 } else { 384 };
        Self {
            provider,
            huggingface_api_key: env_opt("HUGGINGFACE_API_KEY"),
            huggingface_model: env_or(
                "HUGGINGFACE_MODEL",
                "sentence-transformers/all-MiniLM-L6-v2",
            ),
            huggingface_base_url: env_opt("HUGGINGFACE_BASE_URL"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", default_dims),
            query_cache_size: env_usize("QUERY_CACHE_SIZE", 1024),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "huggingface" => self.huggingface_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "mock" => true,
            _ => false,
        }
    }
}

// ── Chat (LLM) ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// "groq" or "openai"
    pub provider: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("CHAT_PROVIDER", "groq"),
            groq_api_key: env_opt("GROQ_API_KEY"),
            groq_model: env_or("GROQ_MODEL", "llama-3.3-70b-versatile"),
            groq_base_url: env_opt("GROQ_BASE_URL"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
            temperature: env_f32("CHAT_TEMPERATURE", 0.7),
            max_tokens: env_u32("CHAT_MAX_TOKENS", 1024),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "groq" => self.groq_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters re-read at the start of the next window. Must stay
    /// strictly below `chunk_size`; see the chunker docs.
    pub overlap: usize,
}

impl ChunkingConfig {
    fn from_env() -> Self {
        Self {
            chunk_size: env_usize("CHUNK_SIZE", 1000),
            overlap: env_usize("CHUNK_OVERLAP", 200),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum cosine similarity for a chunk to count as a match.
    pub match_threshold: f64,
    /// Number of chunks forwarded as chat context.
    pub match_count: i64,
}

impl RetrievalConfig {
    fn from_env() -> Self {
        Self {
            match_threshold: env_opt("MATCH_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.3),
            match_count: env_opt("MATCH_COUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
