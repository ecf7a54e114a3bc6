//! Catalog Search - faceted search over metadata catalog datasets and flow/job pairs
//!
//! - Facet filters compiled to parameterized PostgreSQL
//! - Field conjunction, comment full text and multi-tier ranking
//! - Page and exact total read from one snapshot transaction
//! - Autocomplete lookups for the search UI

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
