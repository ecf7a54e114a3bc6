//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{self, LookupRepository, SearchEngine};
use crate::Result;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub search_engine: Arc<SearchEngine>,
    pub lookups: LookupRepository,
}

impl AppState {
    /// Connect to the database and build the services.
    pub async fn new(config: Config) -> Result<Self> {
        let db_pool = db::create_pool(&config.database).await?;
        Ok(Self::from_pool(config, db_pool))
    }

    /// Build the services on an existing pool.
    pub fn from_pool(config: Config, db_pool: PgPool) -> Self {
        let search_engine = SearchEngine::new(
            db_pool.clone(),
            config.search.clone(),
            config.database.statement_timeout_seconds,
        );
        Self {
            lookups: LookupRepository::new(db_pool.clone()),
            search_engine: Arc::new(search_engine),
            db_pool,
            config: Arc::new(config),
        }
    }
}
