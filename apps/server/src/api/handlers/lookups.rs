//! Autocomplete lookup handlers

use crate::{state::AppState, Result};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TablesQuery {
    pub scopes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub tables: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlowNamesQuery {
    pub apps: Option<String>,
}

pub async fn sources(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.sources().await?))
}

pub async fn scopes(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.scopes().await?))
}

pub async fn tables(
    State(state): State<AppState>,
    Query(query): Query<TablesQuery>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.tables(query.scopes.as_deref()).await?))
}

pub async fn fields(
    State(state): State<AppState>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.fields(query.tables.as_deref()).await?))
}

pub async fn appcodes(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.appcodes().await?))
}

pub async fn flow_names(
    State(state): State<AppState>,
    Query(query): Query<FlowNamesQuery>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.flow_names(query.apps.as_deref()).await?))
}

pub async fn job_names(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.lookups.job_names().await?))
}
