//! Paginated result envelope

use serde::{Deserialize, Serialize};

use crate::db::search::PageWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    /// Exact number of matches before paging
    pub count: i64,
    pub page: i64,
    pub items_per_page: i64,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_flow_job: Option<bool>,
    pub data: Vec<T>,
}

impl<T> ResultPage<T> {
    pub fn new(count: i64, window: PageWindow, data: Vec<T>) -> Self {
        let count = count.max(0);
        Self {
            count,
            page: window.page,
            items_per_page: window.size,
            total_pages: total_pages(count, window.size),
            is_flow_job: None,
            data,
        }
    }

    pub fn empty(window: PageWindow) -> Self {
        Self::new(0, window, Vec::new())
    }

    pub fn flow_jobs(mut self) -> Self {
        self.is_flow_job = Some(true);
        self
    }
}

/// `ceil(count / size)`; zero when there are no matches.
pub fn total_pages(count: i64, size: i64) -> i64 {
    if count <= 0 || size <= 0 {
        return 0;
    }
    (count + size - 1) / size
}
