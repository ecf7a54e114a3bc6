//! Logging initialization for the catalog search server
//!
//! Supports JSON or human-readable output, optional rolling file output, and
//! `RUST_LOG` overrides of the configured level.

use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer alive. Hold it for the lifetime of the process.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    let file = if config.file_enabled {
        Some(create_file_appender(config)?)
    } else {
        None
    };

    let file_guard = match (config.json, file) {
        (true, Some((writer, guard))) => {
            subscriber
                .with(fmt::layer().json().with_current_span(true).with_span_list(false))
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        (true, None) => {
            subscriber
                .with(fmt::layer().json().with_current_span(true).with_span_list(false))
                .init();
            None
        }
        (false, Some((writer, guard))) => {
            subscriber
                .with(fmt::layer().with_target(true))
                .with(fmt::layer().with_target(true).with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        (false, None) => {
            subscriber.with(fmt::layer().with_target(true)).init();
            None
        }
    };

    tracing::info!(
        service_name = %config.service_name,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // sqlx logs every statement at info; keep it quiet unless asked for.
        EnvFilter::new(format!(
            "catalog_search={},catalog_search_server={},tower_http=debug,sqlx=warn",
            config.level, config.level
        ))
    })
}

fn create_file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let directory = &config.file_directory;
    let prefix = &config.file_prefix;
    let appender = match config.file_rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(directory, prefix),
        "minutely" => tracing_appender::rolling::minutely(directory, prefix),
        "never" => tracing_appender::rolling::never(directory, format!("{prefix}.log")),
        _ => tracing_appender::rolling::daily(directory, prefix),
    };

    Ok(tracing_appender::non_blocking(appender))
}
