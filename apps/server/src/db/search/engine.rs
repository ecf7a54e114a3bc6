//! Search implementation - query compilation and execution
//!
//! The SearchEngine is responsible for:
//! - Normalizing caller filter options
//! - Compiling them into parameterized SQL
//! - Running the page query and its exact count in one transaction
//! - Assembling the result envelope

use crate::config::SearchConfig;
use crate::db::search::query_builder::RankingPolicy;
use sqlx::PgPool;

mod api;
mod execute;

/// Search engine executes faceted catalog searches against the database
pub struct SearchEngine {
    db_pool: PgPool,
    ranking: RankingPolicy,
    search_config: SearchConfig,
    /// Per-transaction statement timeout; 0 leaves the server default.
    statement_timeout_ms: u64,
}
