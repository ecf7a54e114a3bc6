use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for {context}");
}

/// `data` array of a result envelope
pub fn page_data(page: &Value) -> anyhow::Result<&Vec<Value>> {
    page.get("data")
        .and_then(|v| v.as_array())
        .context("envelope data is array")
}

/// Dataset names in result order
pub fn dataset_names(page: &Value) -> anyhow::Result<Vec<String>> {
    Ok(page_data(page)?
        .iter()
        .filter_map(|d| d.get("name").and_then(|v| v.as_str()))
        .map(String::from)
        .collect())
}

/// Dataset ids in result order
pub fn dataset_ids(page: &Value) -> anyhow::Result<Vec<i64>> {
    Ok(page_data(page)?
        .iter()
        .filter_map(|d| d.get("id").and_then(|v| v.as_i64()))
        .collect())
}

pub fn display_names(page: &Value) -> anyhow::Result<Vec<String>> {
    Ok(page_data(page)?
        .iter()
        .filter_map(|d| d.get("displayName").and_then(|v| v.as_str()))
        .map(String::from)
        .collect())
}

/// Assert the paging metadata of an envelope
pub fn assert_envelope(page: &Value, count: i64, page_no: i64, size: i64, total_pages: i64) {
    assert_eq!(page["count"].as_i64(), Some(count), "count in {page}");
    assert_eq!(page["page"].as_i64(), Some(page_no), "page in {page}");
    assert_eq!(page["itemsPerPage"].as_i64(), Some(size), "itemsPerPage in {page}");
    assert_eq!(page["totalPages"].as_i64(), Some(total_pages), "totalPages in {page}");
}

pub fn assert_empty_envelope(page: &Value) {
    assert_eq!(page["count"].as_i64(), Some(0), "count in {page}");
    assert_eq!(page["totalPages"].as_i64(), Some(0), "totalPages in {page}");
    assert_eq!(page["data"], Value::Array(vec![]), "data in {page}");
}
