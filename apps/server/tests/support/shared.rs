use anyhow::Context as _;
use catalog_search::Config;
use std::sync::Arc;
use tokio::sync::OnceCell;

static SHARED: OnceCell<Option<Arc<SharedTestResources>>> = OnceCell::const_new();

pub struct SharedTestResources {
    pub base_config: Config,
}

/// Shared test configuration, or `None` when no test database is configured.
pub async fn shared() -> anyhow::Result<Option<Arc<SharedTestResources>>> {
    SHARED
        .get_or_try_init(|| async {
            init_tracing();

            let mut config = Config::load().context("load Config for tests")?;
            let Some(url) = config.database.test_database_url.clone() else {
                return Ok(None);
            };
            config.database.url = url;

            // Small, predictable pages unless a test says otherwise.
            config.search.default_page_size = 10;
            config.search.max_page_size = 100;

            Ok(Some(Arc::new(SharedTestResources {
                base_config: config,
            })))
        })
        .await
        .cloned()
}

fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "catalog_search=info,sqlx=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
