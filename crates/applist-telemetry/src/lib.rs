//! Process-wide tracing setup.
//!
//! Events are written to stderr so that command output on stdout stays
//! machine-readable. Filtering follows `RUST_LOG` and falls back to
//! [`DEFAULT_FILTER`]. Records emitted through the `log` facade are
//! forwarded into tracing.

use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("global tracing subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("log bridge already set: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
}

/// How events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Installs the global subscriber with the [`DEFAULT_FILTER`].
pub fn init(format: LogFormat) -> Result<(), TelemetryError> {
    init_with_filter(format, DEFAULT_FILTER)
}

/// Installs the global subscriber, using `default_filter` when `RUST_LOG`
/// does not provide one.
///
/// Fails if a subscriber or `log` logger is already installed.
pub fn init_with_filter(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let subscriber = Registry::default()
        .with(fmt_layer(format))
        .with(env_filter(default_filter));

    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    tracing::debug!(%format, "Tracing initialized");
    Ok(())
}
