//! Log subscriber setup for processes embedding shipview.

use shipview_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::error::Result;

/// File name prefix for the daily-rotated JSON log.
pub const LOG_FILE_NAME: &str = "shipview.log";

/// Filter for the JSON file layer, which records more than the console.
const FILE_FILTER: &str = "shipview=trace,shipview_cache=trace,shipview_config=debug,info";

/// Install the global subscriber: console (human-readable) + optional
/// rotating JSON file.
///
/// The console filter comes from `RUST_LOG` when set, otherwise from the
/// configured level. Keep the returned guard alive for as long as file
/// logging should flush.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level()));

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
