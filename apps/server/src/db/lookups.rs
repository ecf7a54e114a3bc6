//! Lookup repository - value lists behind the advanced search autocomplete

use crate::db::search::escape::split_list;
use crate::Result;
use sqlx::PgPool;

/// Repository for read-only catalog enumerations
#[derive(Clone)]
pub struct LookupRepository {
    pool: PgPool,
}

impl LookupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dataset sources, most common first
    pub async fn sources(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT source
            FROM dict_dataset
            WHERE source IS NOT NULL
            GROUP BY source
            ORDER BY COUNT(*) DESC, source
        "#;
        self.fetch_strings(query, None).await
    }

    pub async fn scopes(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT DISTINCT parent_name
            FROM dict_dataset
            WHERE parent_name IS NOT NULL
            ORDER BY parent_name
        "#;
        self.fetch_strings(query, None).await
    }

    /// Table names, restricted to the comma-delimited `scopes` when given
    pub async fn tables(&self, scopes: Option<&str>) -> Result<Vec<String>> {
        let scopes = scopes.map(split_list).unwrap_or_default();
        if scopes.is_empty() {
            let query = "SELECT DISTINCT name FROM dict_dataset ORDER BY name";
            return self.fetch_strings(query, None).await;
        }

        let query = r#"
            SELECT DISTINCT name
            FROM dict_dataset
            WHERE parent_name = ANY($1::text[])
            ORDER BY name
        "#;
        self.fetch_strings(query, Some(scopes)).await
    }

    /// Field names, restricted to datasets whose name matches any of the
    /// comma-delimited `tables` regular expressions (case-insensitive). A
    /// pattern that does not compile is matched as literal text.
    pub async fn fields(&self, tables: Option<&str>) -> Result<Vec<String>> {
        let tables = tables.map(split_list).unwrap_or_default();
        if tables.is_empty() {
            let query = "SELECT DISTINCT field_name FROM dict_field_detail ORDER BY field_name";
            return self.fetch_strings(query, None).await;
        }

        let query = r#"
            SELECT DISTINCT f.field_name
            FROM dict_field_detail f
            JOIN dict_dataset d ON d.id = f.dataset_id
            WHERE d.name ~* ANY($1::text[])
            ORDER BY f.field_name
        "#;
        let patterns: Vec<String> = tables.iter().map(|t| table_name_pattern(t)).collect();
        match self.try_fetch_strings(query, Some(patterns)).await {
            Err(e) if is_invalid_regex(&e) => {
                // Postgres rejected syntax the regex crate accepts.
                tracing::debug!(error = %e, "table pattern rejected, matching literally");
                let literal = tables.iter().map(|t| regex::escape(t)).collect();
                self.fetch_strings(query, Some(literal)).await
            }
            other => other.map_err(crate::Error::Database),
        }
    }

    pub async fn appcodes(&self) -> Result<Vec<String>> {
        let query = "SELECT DISTINCT app_code FROM cfg_application ORDER BY app_code";
        self.fetch_strings(query, None).await
    }

    /// Flow names, restricted to the comma-delimited application codes when given
    pub async fn flow_names(&self, apps: Option<&str>) -> Result<Vec<String>> {
        let apps = apps.map(split_list).unwrap_or_default();
        if apps.is_empty() {
            let query = "SELECT DISTINCT flow_name FROM flow ORDER BY flow_name";
            return self.fetch_strings(query, None).await;
        }

        let query = r#"
            SELECT DISTINCT f.flow_name
            FROM flow f
            JOIN cfg_application a ON a.app_id = f.app_id
            WHERE a.app_code = ANY($1::text[])
            ORDER BY f.flow_name
        "#;
        self.fetch_strings(query, Some(apps)).await
    }

    pub async fn job_names(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT DISTINCT job_name
            FROM flow_job
            WHERE job_name IS NOT NULL AND job_name <> ''
            ORDER BY job_name
        "#;
        self.fetch_strings(query, None).await
    }

    async fn fetch_strings(&self, query: &str, values: Option<Vec<String>>) -> Result<Vec<String>> {
        self.try_fetch_strings(query, values)
            .await
            .map_err(crate::Error::Database)
    }

    async fn try_fetch_strings(
        &self,
        query: &str,
        values: Option<Vec<String>>,
    ) -> sqlx::Result<Vec<String>> {
        let mut q = sqlx::query_scalar::<_, String>(query);
        if let Some(values) = values {
            q = q.bind(values);
        }
        q.fetch_all(&self.pool).await
    }
}

/// SQLSTATE `invalid_regular_expression`.
const INVALID_REGEX: &str = "2201B";

fn is_invalid_regex(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(INVALID_REGEX))
}

/// The table term as a regular expression, or its escaped literal when it
/// is not a valid one.
fn table_name_pattern(term: &str) -> String {
    if regex::Regex::new(term).is_ok() {
        term.to_string()
    } else {
        regex::escape(term)
    }
}
