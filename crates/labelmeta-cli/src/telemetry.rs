//! Logging setup
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json_format: bool,
    pub include_timestamps: bool,
    pub include_thread_ids: bool,
    pub include_target: bool,
}

impl From<&LoggingConfig> for TelemetryConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            log_level: logging.level.clone(),
            json_format: logging.json_format,
            include_timestamps: logging.include_timestamps,
            include_thread_ids: logging.include_thread_ids,
            include_target: logging.include_target,
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_with_config(config: TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(config.include_target)
                    .with_thread_ids(config.include_thread_ids),
            )
            .init();
    } else if config.include_timestamps {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.include_target)
                    .with_thread_ids(config.include_thread_ids),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr)
                    .with_target(config.include_target)
                    .with_thread_ids(config.include_thread_ids),
            )
            .init();
    }
}
