//! Catalog entities returned by advanced search

use serde::{Deserialize, Serialize};

/// A dataset record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    pub source: Option<String>,
    pub urn: String,
    pub schema: Option<String>,
}

/// Raw flow/job row. Job columns are NULL when the flow-only relation was used.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FlowJobRow {
    pub app_code: String,
    pub flow_id: i64,
    pub flow_name: String,
    pub flow_path: Option<String>,
    pub flow_group: Option<String>,
    pub job_id: Option<i64>,
    pub job_name: Option<String>,
    pub job_path: Option<String>,
    pub job_type: Option<String>,
}

/// A flow, or a job within a flow, with its derived display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowJob {
    pub app_code: String,
    pub flow_id: i64,
    pub flow_name: String,
    pub flow_path: Option<String>,
    pub flow_group: Option<String>,
    pub job_name: Option<String>,
    pub job_path: Option<String>,
    pub job_type: Option<String>,

    /// Job name when present and non-blank, otherwise the flow name
    pub display_name: String,

    /// UI route to the flow's first page
    pub link: String,

    /// `appCode/flowPath`, or `appCode/jobPath` when searching jobs
    pub path: String,
}

impl FlowJob {
    pub fn from_row(row: FlowJobRow, job_relation: bool) -> Self {
        let display_name = match row.job_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => row.flow_name.clone(),
        };

        let link = format!(
            "#/flows/{}/{}/{}/page/1",
            row.app_code,
            row.flow_group.as_deref().unwrap_or_default(),
            row.flow_id
        );

        let tail = if job_relation {
            row.job_path.as_deref()
        } else {
            row.flow_path.as_deref()
        };
        let path = format!("{}/{}", row.app_code, tail.unwrap_or_default());

        Self {
            app_code: row.app_code,
            flow_id: row.flow_id,
            flow_name: row.flow_name,
            flow_path: row.flow_path,
            flow_group: row.flow_group,
            job_name: row.job_name,
            job_path: row.job_path,
            job_type: row.job_type,
            display_name,
            link,
            path,
        }
    }
}
