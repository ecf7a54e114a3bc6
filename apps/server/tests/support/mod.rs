pub mod assertions;
pub mod shared;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use catalog_search::{api::create_router, AppState, Config};
use futures::FutureExt as _;
use serde_json::Value;
use sqlx::{Connection as _, PgConnection, PgPool};
use std::{future::Future, pin::Pin};
use tower::ServiceExt as _;
use url::Url;
use uuid::Uuid;

pub use assertions::*;
pub use fixtures::*;

pub type TestFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;

/// Throwaway schema on the test database, reached through `search_path`.
struct TestSchema {
    name: String,
    admin_url: String,
}

impl TestSchema {
    async fn create(admin_url: &str) -> anyhow::Result<Self> {
        let name = format!("catalog_test_{}", Uuid::new_v4().simple());
        let mut conn = PgConnection::connect(admin_url)
            .await
            .context("connect to test database")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{name}""#))
            .execute(&mut conn)
            .await
            .context("create test schema")?;
        Ok(Self {
            name,
            admin_url: admin_url.to_string(),
        })
    }

    /// Connection URL whose sessions resolve tables in this schema.
    fn scoped_url(&self) -> anyhow::Result<String> {
        let mut url = Url::parse(&self.admin_url).context("parse database URL")?;
        url.query_pairs_mut()
            .append_pair("options", &format!("-c search_path={}", self.name));
        Ok(url.to_string())
    }

    async fn remove(self) -> anyhow::Result<()> {
        let mut conn = PgConnection::connect(&self.admin_url)
            .await
            .context("connect to test database")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, self.name))
            .execute(&mut conn)
            .await
            .context("drop test schema")?;
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    schema: TestSchema,
}

impl TestApp {
    async fn start(mut config: Config) -> anyhow::Result<Self> {
        let schema = TestSchema::create(&config.database.url).await?;

        config.database.url = schema.scoped_url()?;
        config.database.pool_min_size = 0;
        config.database.pool_max_size = 2;

        let state = AppState::new(config).await.context("initialize AppState")?;
        sqlx::migrate!("./migrations")
            .run(&state.db_pool)
            .await
            .context("apply catalog migrations")?;

        Ok(Self {
            router: create_router(state.clone()),
            state,
            schema,
        })
    }

    async fn shutdown(self) -> anyhow::Result<()> {
        self.state.db_pool.close().await;
        self.schema.remove().await
    }

    pub fn pool(&self) -> &PgPool {
        &self.state.db_pool
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("accept", "application/json")
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;
        Ok((status, headers, body))
    }

    /// POST a JSON body and decode the JSON response, asserting 200.
    pub async fn post_json(&self, path_and_query: &str, body: &Value) -> anyhow::Result<Value> {
        let (status, _, bytes) = self
            .request(Method::POST, path_and_query, Some(to_json_body(body)?))
            .await?;
        assert_status(status, StatusCode::OK, path_and_query);
        serde_json::from_slice(&bytes).context("decode response JSON")
    }

    /// GET and decode the JSON response, asserting 200.
    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<Value> {
        let (status, _, bytes) = self.request(Method::GET, path_and_query, None).await?;
        assert_status(status, StatusCode::OK, path_and_query);
        serde_json::from_slice(&bytes).context("decode response JSON")
    }
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(&'a TestApp) -> TestFuture<'a>,
{
    with_test_app_with_config(|_| {}, f).await
}

/// Run `f` against a fresh schema. Passes without running when no test
/// database is configured.
pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(&'a TestApp) -> TestFuture<'a>,
{
    let Some(shared) = shared::shared().await? else {
        eprintln!("skipping: set CATALOG__DATABASE__TEST_DATABASE_URL to run database tests");
        return Ok(());
    };

    let mut config = shared.base_config.clone();
    configure(&mut config);
    let app = TestApp::start(config).await?;

    let outcome = std::panic::AssertUnwindSafe(f(&app)).catch_unwind().await;
    if let Err(e) = app.shutdown().await {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match outcome {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
