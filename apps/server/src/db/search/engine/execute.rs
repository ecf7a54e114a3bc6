use super::SearchEngine;
use crate::db::search::query_builder::{BindValue, CompiledQuery};
use crate::{Error, Result};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, Postgres, Transaction};

macro_rules! bind_all {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        for value in $binds {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(vs) => query.bind(vs),
                BindValue::BigInt(v) => query.bind(v),
                BindValue::BigIntArray(vs) => query.bind(vs),
            };
        }
        query
    }};
}

impl SearchEngine {
    /// Begin the read-only snapshot transaction shared by the page and count queries.
    pub(super) async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.db_pool.begin().await.map_err(Error::Database)?;

        // Must be the first statement of the transaction.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if self.statement_timeout_ms > 0 {
            sqlx::query("SELECT set_config('statement_timeout', $1, true)")
                .bind(format!("{}ms", self.statement_timeout_ms))
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        Ok(tx)
    }

    /// Run the window query, then the exact count over the same predicate on
    /// the same connection.
    pub(super) async fn fetch_page<T>(
        &self,
        conn: &mut PgConnection,
        query: &CompiledQuery,
    ) -> Result<(i64, Vec<T>)>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let (sql, bind_values) = query.build_sql();
        tracing::debug!(sql = %sql, binds = bind_values.len(), "Executing search page");

        let rows = bind_all!(sqlx::query_as::<_, T>(&sql), bind_values)
            .fetch_all(&mut *conn)
            .await
            .map_err(Error::Database)?;

        let total = self.count_matches(conn, query).await?;
        Ok((total, rows))
    }

    pub(super) async fn count_matches(
        &self,
        conn: &mut PgConnection,
        query: &CompiledQuery,
    ) -> Result<i64> {
        let (sql, bind_values) = query.build_count_sql();
        tracing::debug!(sql = %sql, strategy = ?query.count_strategy(), "Executing search count");

        let total = bind_all!(sqlx::query_scalar::<_, i64>(&sql), bind_values)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Error::Database)?;

        Ok(total.unwrap_or_else(|| {
            tracing::warn!("Count query returned no row; reporting 0 matches");
            0
        }))
    }

    /// Candidate ids for the first stage of a narrowed search.
    pub(super) async fn fetch_ids(
        &self,
        conn: &mut PgConnection,
        query: &CompiledQuery,
    ) -> Result<Vec<i64>> {
        let (sql, bind_values) = query.build_ids_sql();
        tracing::debug!(sql = %sql, "Collecting candidate ids");

        let ids = bind_all!(sqlx::query_scalar::<_, i64>(&sql), bind_values)
            .fetch_all(&mut *conn)
            .await
            .map_err(Error::Database)?;
        Ok(ids)
    }
}
