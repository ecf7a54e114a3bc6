//! Advanced search routes, mounted under `/api/v1/advsearch`

use crate::api::handlers::{lookups, search};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn advsearch_routes() -> Router<AppState> {
    Router::new()
        // Faceted search
        .route("/datasets", post(search::search_datasets))
        .route("/flows", post(search::search_flow_jobs))
        .route("/search", get(search::search_datasets_query))
        .route("/search/flows", get(search::search_flow_jobs_query))
        // Autocomplete lookups
        .route("/sources", get(lookups::sources))
        .route("/scopes", get(lookups::scopes))
        .route("/tables", get(lookups::tables))
        .route("/fields", get(lookups::fields))
        .route("/appcodes", get(lookups::appcodes))
        .route("/flowNames", get(lookups::flow_names))
        .route("/jobNames", get(lookups::job_names))
}
