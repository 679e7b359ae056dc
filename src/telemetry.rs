//! Tracing subscriber setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::{
    config::LoggingConfig,
    error::{AppError, AppResult},
};

const LOG_FILE_PREFIX: &str = "venuity-client.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Default filter directive when `RUST_LOG` is not set
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("venuity_client={}", config.level)
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for as long as logs should reach the file.
pub fn init_tracing(config: &LoggingConfig) -> AppResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let json = config.format.eq_ignore_ascii_case("json");
    layers.push(if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    });

    let guard = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!("Venuity client v{} logging at {}", env!("CARGO_PKG_VERSION"), config.level);
    Ok(guard)
}
