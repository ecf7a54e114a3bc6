//! Database layer - connection pool, search engine and lookups

pub mod lookups;
pub mod search;

pub use lookups::LookupRepository;
pub use search::engine::SearchEngine;

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Create the shared connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> crate::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(crate::Error::Database)?;

    tracing::info!(
        min = config.pool_min_size,
        max = config.pool_max_size,
        "Database pool ready"
    );
    Ok(pool)
}
