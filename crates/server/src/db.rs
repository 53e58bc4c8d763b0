use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use docchat_core::config::PostgresConfig;

/// Create a PostgreSQL connection pool and run migrations.
/// Returns None if Postgres is not configured — document upload, search,
/// and chat retrieval stay disabled until it is.
pub async fn init_pg_pool(config: &PostgresConfig) -> Option<PgPool> {
    if !config.is_configured() {
        warn!("PG_USERNAME not set — document storage and retrieval disabled");
        return None;
    }

    match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await
    {
        Ok(pool) => {
            info!("PostgreSQL connected: {}", config.host);
            match sqlx::migrate!("../../migrations").run(&pool).await {
                Ok(_) => {
                    info!("Database migrations applied");
                    Some(pool)
                }
                Err(e) => {
                    warn!("Failed to run migrations: {} — document features disabled", e);
                    None
                }
            }
        }
        Err(e) => {
            warn!("Failed to connect to PostgreSQL: {} — document features disabled", e);
            None
        }
    }
}
