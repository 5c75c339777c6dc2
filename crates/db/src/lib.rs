use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod schema;

pub type DbPool = sqlx::PgPool;

/// Connection pool sizing for short-lived tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long to wait for a free connection before giving up.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a connection pool from a database URL.
///
/// Connects eagerly, so an unreachable server or bad credentials surface
/// here rather than on first query. The caller owns the pool and is
/// responsible for closing it.
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}
