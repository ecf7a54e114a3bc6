//! Faceted search handlers
//!
//! - POST /datasets, /flows: filter options in the JSON body
//! - GET  /search, /search/flows: filter options as a JSON `searchOpts` query value
//!
//! Paging comes from the `page` and `size` query parameters in both forms.

use crate::{
    db::search::PageRequest,
    models::{Dataset, FlowJob, ResultPage},
    state::AppState,
    Result,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(rename = "searchOpts")]
    pub search_opts: Option<String>,
}

impl SearchQuery {
    fn paging(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
        }
    }
}

/// Parse filter options. Anything that is not valid JSON is treated as absent.
fn parse_options(raw: &[u8]) -> JsonValue {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return JsonValue::Null;
    }
    serde_json::from_slice(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring unparseable search options");
        JsonValue::Null
    })
}

pub async fn search_datasets(
    State(state): State<AppState>,
    Query(paging): Query<PageRequest>,
    body: Bytes,
) -> Result<Json<ResultPage<Dataset>>> {
    let options = parse_options(&body);
    let window = state.search_engine.page_window(&paging);
    let page = state.search_engine.search_datasets(&options, window).await?;
    Ok(Json(page))
}

pub async fn search_flow_jobs(
    State(state): State<AppState>,
    Query(paging): Query<PageRequest>,
    body: Bytes,
) -> Result<Json<ResultPage<FlowJob>>> {
    let options = parse_options(&body);
    let window = state.search_engine.page_window(&paging);
    let page = state.search_engine.search_flow_jobs(&options, window).await?;
    Ok(Json(page))
}

pub async fn search_datasets_query(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ResultPage<Dataset>>> {
    let options = parse_options(query.search_opts.as_deref().unwrap_or_default().as_bytes());
    let window = state.search_engine.page_window(&query.paging());
    let page = state.search_engine.search_datasets(&options, window).await?;
    Ok(Json(page))
}

pub async fn search_flow_jobs_query(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ResultPage<FlowJob>>> {
    let options = parse_options(query.search_opts.as_deref().unwrap_or_default().as_bytes());
    let window = state.search_engine.page_window(&query.paging());
    let page = state.search_engine.search_flow_jobs(&options, window).await?;
    Ok(Json(page))
}
