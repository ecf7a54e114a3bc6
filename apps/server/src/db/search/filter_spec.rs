//! Normalization of caller-supplied search options.
//!
//! The filter structure arrives as loosely-typed JSON. Every recognized facet is
//! reduced to trimmed, blank-free, de-duplicated value lists. Anything that
//! cannot be interpreted contributes no constraint instead of failing the call.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::escape::split_list;
use crate::config::SearchConfig;

/// Include/exclude value lists for one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetValues {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl FacetValues {
    fn from_section(section: Option<&JsonValue>) -> Self {
        Self {
            include: sub_list(section, "in"),
            exclude: sub_list(section, "not"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Field-name facet with its three matching modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFacet {
    /// At least one field must match one of these terms.
    pub any: Vec<String>,
    /// Every term must match some field of the same dataset.
    pub all: Vec<String>,
    /// No field may match any of these terms.
    pub not: Vec<String>,
}

impl FieldFacet {
    fn from_section(section: Option<&JsonValue>) -> Self {
        Self {
            any: sub_list(section, "any"),
            all: sub_list(section, "all"),
            not: sub_list(section, "not"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.all.is_empty() && self.not.is_empty()
    }
}

/// Normalized dataset search options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFilter {
    pub scope: FacetValues,
    pub table: FacetValues,
    pub fields: FieldFacet,
    pub sources: Vec<String>,
    /// Free text matched against dataset and field comments.
    pub comments: Option<String>,
}

impl DatasetFilter {
    /// Returns `None` when the options are absent or not a JSON object.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            scope: FacetValues::from_section(obj.get("scope")),
            table: FacetValues::from_section(obj.get("table")),
            fields: FieldFacet::from_section(obj.get("fields")),
            sources: obj
                .get("sources")
                .and_then(scalar_text)
                .map(|s| split_list(&s))
                .unwrap_or_default(),
            comments: obj
                .get("comments")
                .and_then(scalar_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    /// True when any facet other than free text constrains the result.
    pub fn has_structured_facets(&self) -> bool {
        !self.scope.is_empty()
            || !self.table.is_empty()
            || !self.fields.is_empty()
            || !self.sources.is_empty()
    }
}

/// Normalized flow/job search options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowJobFilter {
    pub appcode: FacetValues,
    pub flow: FacetValues,
    pub job: FacetValues,
}

impl FlowJobFilter {
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            appcode: FacetValues::from_section(obj.get("appcode")),
            flow: FacetValues::from_section(obj.get("flow")),
            job: FacetValues::from_section(obj.get("job")),
        })
    }

    /// Job facets switch the query to the job-inclusive relation.
    pub fn uses_job_relation(&self) -> bool {
        !self.job.is_empty()
    }
}

/// Raw paging parameters as they arrive on the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: i64,
    pub size: i64,
}

impl PageWindow {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl PageRequest {
    /// Clamp to a valid window: page >= 1, 0 < size <= max_page_size.
    pub fn resolve(&self, config: &SearchConfig) -> PageWindow {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1);
        let size = match self.size {
            Some(s) if s > 0 => s.min(config.max_page_size),
            _ => config.default_page_size,
        };
        PageWindow::new(page, size)
    }
}

fn sub_list(section: Option<&JsonValue>, key: &str) -> Vec<String> {
    section
        .and_then(JsonValue::as_object)
        .and_then(|obj| obj.get(key))
        .and_then(scalar_text)
        .map(|s| split_list(&s))
        .unwrap_or_default()
}

/// Textual form of a scalar, or of an array of scalars joined with commas.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|v| !v.is_array() && !v.is_object())
                .filter_map(scalar_text)
                .collect();
            Some(parts.join(","))
        }
        JsonValue::Null | JsonValue::Object(_) => None,
    }
}
