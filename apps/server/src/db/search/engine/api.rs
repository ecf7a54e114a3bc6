use super::SearchEngine;
use crate::config::SearchConfig;
use crate::db::search::filter_spec::{DatasetFilter, FlowJobFilter, PageRequest, PageWindow};
use crate::db::search::query_builder::{self, CompiledQuery, DatasetPlan, RankingPolicy};
use crate::metrics::{record_matches, record_search};
use crate::models::{Dataset, FlowJob, FlowJobRow, ResultPage};
use crate::Result;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::time::Instant;

const DATASETS: &str = "datasets";
const FLOW_JOBS: &str = "flow_jobs";

impl SearchEngine {
    /// Create a new search engine.
    pub fn new(db_pool: PgPool, search_config: SearchConfig, statement_timeout_seconds: u64) -> Self {
        Self {
            db_pool,
            ranking: RankingPolicy::from_config(&search_config),
            search_config,
            statement_timeout_ms: statement_timeout_seconds.saturating_mul(1000),
        }
    }

    /// Clamp raw paging parameters to the configured limits.
    pub fn page_window(&self, request: &PageRequest) -> PageWindow {
        request.resolve(&self.search_config)
    }

    /// Search datasets.
    ///
    /// A missing or non-object `options` yields an empty page. Free text with
    /// no structured facets runs the comment-only query; free text together
    /// with facets first collects the facet matches, then matches comments
    /// within them.
    #[tracing::instrument(skip(self, options), fields(page = window.page, size = window.size))]
    pub async fn search_datasets(
        &self,
        options: &JsonValue,
        window: PageWindow,
    ) -> Result<ResultPage<Dataset>> {
        let started = Instant::now();

        let Some(filter) = DatasetFilter::from_json(options) else {
            tracing::debug!("Dataset search options are not an object; returning empty page");
            record_search(DATASETS, "none", "empty", started.elapsed().as_secs_f64());
            return Ok(ResultPage::empty(window));
        };

        let plan = query_builder::compile_dataset_search(&filter, window, &self.ranking);
        let path = plan.label();
        tracing::debug!(path, "Compiled dataset search");

        let result = self.run_dataset_plan(plan, window).await;
        self.observe(DATASETS, path, &result, started);
        result
    }

    /// Search flows, or jobs when a job facet is present.
    #[tracing::instrument(skip(self, options), fields(page = window.page, size = window.size))]
    pub async fn search_flow_jobs(
        &self,
        options: &JsonValue,
        window: PageWindow,
    ) -> Result<ResultPage<FlowJob>> {
        let started = Instant::now();

        let Some(filter) = FlowJobFilter::from_json(options) else {
            tracing::debug!("Flow search options are not an object; returning empty page");
            record_search(FLOW_JOBS, "none", "empty", started.elapsed().as_secs_f64());
            return Ok(ResultPage::empty(window).flow_jobs());
        };

        let with_jobs = filter.uses_job_relation();
        let path = if with_jobs { "job" } else { "flow" };
        let query = query_builder::compile_flow_job_search(&filter, window);
        let result = self.run_flow_query(&query, window, with_jobs).await;
        self.observe(FLOW_JOBS, path, &result, started);
        result
    }

    async fn run_dataset_plan(
        &self,
        plan: DatasetPlan,
        window: PageWindow,
    ) -> Result<ResultPage<Dataset>> {
        let mut tx = self.begin_snapshot().await?;

        let (count, data) = match plan {
            DatasetPlan::Structured(query) | DatasetPlan::FullText(query) => {
                self.fetch_page::<Dataset>(&mut tx, &query).await?
            }
            DatasetPlan::Narrowed {
                candidates,
                followup,
            } => {
                let ids = self.fetch_ids(&mut tx, &candidates).await?;
                if ids.is_empty() {
                    tracing::debug!("No structured candidates; skipping comment match");
                    tx.commit().await?;
                    return Ok(ResultPage::empty(window));
                }
                tracing::debug!(candidates = ids.len(), "Matching comments within candidates");
                let query = followup.compile(ids);
                self.fetch_page::<Dataset>(&mut tx, &query).await?
            }
        };

        tx.commit().await?;
        Ok(ResultPage::new(count, window, data))
    }

    async fn run_flow_query(
        &self,
        query: &CompiledQuery,
        window: PageWindow,
        with_jobs: bool,
    ) -> Result<ResultPage<FlowJob>> {
        let mut tx = self.begin_snapshot().await?;
        let (count, rows) = self.fetch_page::<FlowJobRow>(&mut tx, query).await?;
        tx.commit().await?;

        let data = rows
            .into_iter()
            .map(|row| FlowJob::from_row(row, with_jobs))
            .collect();
        Ok(ResultPage::new(count, window, data).flow_jobs())
    }

    fn observe<T>(
        &self,
        domain: &str,
        path: &str,
        result: &Result<ResultPage<T>>,
        started: Instant,
    ) {
        let seconds = started.elapsed().as_secs_f64();
        match result {
            Ok(page) => {
                record_search(domain, path, "success", seconds);
                record_matches(domain, page.count);
                tracing::info!(
                    domain,
                    path,
                    count = page.count,
                    returned = page.data.len(),
                    elapsed_ms = (seconds * 1000.0) as u64,
                    "Search completed"
                );
            }
            Err(e) => {
                record_search(domain, path, "error", seconds);
                tracing::warn!(domain, path, error = %e, "Search failed");
            }
        }
    }
}
