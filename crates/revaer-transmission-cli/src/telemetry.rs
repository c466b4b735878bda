//! Logging setup for the CLI.
//!
//! Diagnostics go to stderr so that rendered output on stdout stays parseable.

use anyhow::anyhow;
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::{CliError, CliResult};

/// Default filter when neither `RUST_LOG` nor `--log-level` is provided.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";

/// Available output formats for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global tracing subscriber.
pub(crate) fn init_logging(level: &str, format: LogFormat) -> CliResult<()> {
    let filter = build_env_filter(level);
    let installed = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
    };
    installed
        .map_err(|err| CliError::failure(anyhow!("failed to install tracing subscriber: {err}")))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
