//! SQL query builder for faceted catalog searches.
//!
//! Builds SQL queries from normalized filter options, including:
//! - Base relation and joins for datasets or flow/job pairs
//! - Facet predicates (include/exclude, field conjunction, free text)
//! - Ranking and pagination
//! - The companion exact-count query over the same predicate

use super::filter_spec::{DatasetFilter, FlowJobFilter, PageWindow};

mod bind;
mod clauses;
mod predicate;
mod ranking;

use bind::push_bigint;
use clauses::FieldConjunction;
pub use predicate::{Predicate, SubSelect, WhereTree};
pub use ranking::{OrderKey, OrderSpec, RankingPolicy, Tier};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    BigInt(i64),
    BigIntArray(Vec<i64>),
}

/// How the exact total for a page is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    /// `COUNT(*)` over the same relation and predicate as the window query.
    SamePredicate,
    /// Same as above, but the predicate embeds candidate ids from an earlier
    /// structured stage.
    TwoStage,
}

const DATASET_COLUMNS: &str = "d.id, d.name, d.source, d.urn, d.\"schema\"";
const DATASET_FROM: &str = "dict_dataset d";

const FLOW_COLUMNS: &str = "a.app_code, f.flow_id, f.flow_name, f.flow_path, f.flow_group, \
     NULL::bigint AS job_id, NULL::text AS job_name, NULL::text AS job_path, NULL::text AS job_type";
const FLOW_FROM: &str = "flow f JOIN cfg_application a ON a.app_id = f.app_id";

const FLOW_JOB_COLUMNS: &str = "a.app_code, f.flow_id, f.flow_name, f.flow_path, f.flow_group, \
     j.job_id, j.job_name, j.job_path, j.job_type";
const FLOW_JOB_FROM: &str = "flow_job j \
     JOIN flow f ON f.app_id = j.app_id AND f.flow_id = j.flow_id \
     JOIN cfg_application a ON a.app_id = f.app_id";

/// Declarative description of one query. Compiling it is pure: the same
/// builder always yields the same SQL and binds.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    columns: &'static str,
    from: &'static str,
    id_column: &'static str,
    field_conjunction: Option<FieldConjunction>,
    filters: Vec<Predicate>,
    order: OrderSpec,
    window: Option<PageWindow>,
    count_strategy: CountStrategy,
}

impl QueryBuilder {
    pub fn new(columns: &'static str, from: &'static str, id_column: &'static str) -> Self {
        Self {
            columns,
            from,
            id_column,
            field_conjunction: None,
            filters: Vec::new(),
            order: OrderSpec::default(),
            window: None,
            count_strategy: CountStrategy::SamePredicate,
        }
    }

    pub fn datasets() -> Self {
        Self::new(DATASET_COLUMNS, DATASET_FROM, "d.id")
    }

    pub fn flows(with_jobs: bool) -> Self {
        if with_jobs {
            Self::new(FLOW_JOB_COLUMNS, FLOW_JOB_FROM, "j.job_id")
        } else {
            Self::new(FLOW_COLUMNS, FLOW_FROM, "f.flow_id")
        }
    }

    pub fn filter(mut self, predicate: Option<Predicate>) -> Self {
        if let Some(p) = predicate {
            self.filters.push(p);
        }
        self
    }

    fn field_conjunction(mut self, conjunction: Option<FieldConjunction>) -> Self {
        if let Some(c) = conjunction {
            self.filters.push(c.membership());
            self.field_conjunction = Some(c);
        }
        self
    }

    pub fn order_by(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    pub fn window(mut self, window: PageWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn count_strategy(mut self, strategy: CountStrategy) -> Self {
        self.count_strategy = strategy;
        self
    }

    /// Compile to SQL sections. Filter binds come first so the count query can
    /// reuse a prefix of the bind list.
    pub fn compile(&self) -> CompiledQuery {
        let mut binds = Vec::new();

        let with_clause = self
            .field_conjunction
            .as_ref()
            .map(|c| c.compile_cte(&mut binds))
            .unwrap_or_default();

        let mut tree = WhereTree::default();
        for filter in &self.filters {
            if let Some(clause) = filter.compile(&mut binds) {
                tree.push(&clause);
            }
        }
        let filter_bind_len = binds.len();

        let order_by = self.order.compile(&mut binds);

        let limit_clause = self.window.map(|w| {
            let limit_idx = push_bigint(&mut binds, w.size);
            let offset_idx = push_bigint(&mut binds, w.offset());
            format!(" LIMIT ${} OFFSET ${}", limit_idx, offset_idx)
        });

        CompiledQuery {
            with_clause,
            columns: self.columns,
            from: self.from,
            id_column: self.id_column,
            where_clause: tree.into_sql(),
            order_by,
            limit_clause,
            binds,
            filter_bind_len,
            count_strategy: self.count_strategy,
        }
    }
}

/// Compiled SQL sections plus their bind list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    with_clause: String,
    columns: &'static str,
    from: &'static str,
    id_column: &'static str,
    where_clause: String,
    order_by: Option<String>,
    limit_clause: Option<String>,
    binds: Vec<BindValue>,
    filter_bind_len: usize,
    count_strategy: CountStrategy,
}

impl CompiledQuery {
    /// Window query: columns, predicate, ranking and `LIMIT/OFFSET`.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut sql = format!(
            "{}SELECT {} FROM {}{}",
            self.with_clause, self.columns, self.from, self.where_clause
        );
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(limit) = &self.limit_clause {
            sql.push_str(limit);
        }
        (sql, self.binds.clone())
    }

    /// Exact total over the same predicate without the window.
    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let sql = format!(
            "{}SELECT COUNT(*) FROM {}{}",
            self.with_clause, self.from, self.where_clause
        );
        (sql, self.filter_binds())
    }

    /// Identifier projection of the predicate, unordered and unwindowed.
    pub fn build_ids_sql(&self) -> (String, Vec<BindValue>) {
        let sql = format!(
            "{}SELECT {} FROM {}{}",
            self.with_clause, self.id_column, self.from, self.where_clause
        );
        (sql, self.filter_binds())
    }

    pub fn count_strategy(&self) -> CountStrategy {
        self.count_strategy
    }

    pub fn has_where(&self) -> bool {
        !self.where_clause.is_empty()
    }

    fn filter_binds(&self) -> Vec<BindValue> {
        self.binds[..self.filter_bind_len].to_vec()
    }
}

/// Execution plan for a dataset search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetPlan {
    /// Facets only (or nothing at all).
    Structured(CompiledQuery),
    /// Free text with no structured facets.
    FullText(CompiledQuery),
    /// Structured facets narrow candidate ids, then free text is matched
    /// within them.
    Narrowed {
        candidates: CompiledQuery,
        followup: FullTextFollowup,
    },
}

impl DatasetPlan {
    pub fn label(&self) -> &'static str {
        match self {
            DatasetPlan::Structured(_) => "structured",
            DatasetPlan::FullText(_) => "fulltext",
            DatasetPlan::Narrowed { .. } => "narrowed",
        }
    }
}

/// Second stage of a narrowed search, waiting for its candidate ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextFollowup {
    text: String,
    order: OrderSpec,
    window: PageWindow,
}

impl FullTextFollowup {
    pub fn compile(&self, candidate_ids: Vec<i64>) -> CompiledQuery {
        QueryBuilder::datasets()
            .filter(Some(Predicate::IdIn {
                column: "d.id",
                ids: candidate_ids,
            }))
            .filter(Some(clauses::comment_match_clause(&self.text)))
            .order_by(self.order.clone())
            .window(self.window)
            .count_strategy(CountStrategy::TwoStage)
            .compile()
    }
}

fn structured_datasets(filter: &DatasetFilter) -> QueryBuilder {
    QueryBuilder::datasets()
        .filter(clauses::scope_clause(&filter.scope))
        .filter(clauses::table_clause(&filter.table))
        .filter(clauses::field_any_clause(&filter.fields.any))
        .field_conjunction(FieldConjunction::new(&filter.fields.all))
        .filter(clauses::field_not_clause(&filter.fields.not))
        .filter(clauses::sources_clause(&filter.sources))
}

/// Compile a dataset search into its execution plan.
pub fn compile_dataset_search(
    filter: &DatasetFilter,
    window: PageWindow,
    ranking: &RankingPolicy,
) -> DatasetPlan {
    let structured_order = ranking.for_datasets(&filter.table.include);

    match (&filter.comments, filter.has_structured_facets()) {
        (Some(text), false) => DatasetPlan::FullText(
            QueryBuilder::datasets()
                .filter(Some(clauses::comment_match_clause(text)))
                .order_by(ranking.for_fulltext())
                .window(window)
                .compile(),
        ),
        (Some(text), true) => DatasetPlan::Narrowed {
            candidates: structured_datasets(filter).compile(),
            followup: FullTextFollowup {
                text: text.clone(),
                order: structured_order,
                window,
            },
        },
        (None, _) => DatasetPlan::Structured(
            structured_datasets(filter)
                .order_by(structured_order)
                .window(window)
                .compile(),
        ),
    }
}

/// Compile a flow/job search. The job relation is joined only when a job
/// facet is active.
pub fn compile_flow_job_search(filter: &FlowJobFilter, window: PageWindow) -> CompiledQuery {
    let with_jobs = filter.uses_job_relation();
    let order = if with_jobs {
        OrderSpec::columns(&["a.app_code", "f.app_id", "f.flow_id", "j.job_id"])
    } else {
        OrderSpec::columns(&["a.app_code", "f.app_id", "f.flow_id"])
    };

    QueryBuilder::flows(with_jobs)
        .filter(clauses::appcode_clause(&filter.appcode))
        .filter(clauses::flow_clause(&filter.flow))
        .filter(clauses::job_clause(&filter.job))
        .order_by(order)
        .window(window)
        .compile()
}
