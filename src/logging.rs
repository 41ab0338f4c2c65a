//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The library only emits events; the binary installs the subscriber once at
//! startup from the `[logging]` config section and the `-v` count.
//!
//! # Log Levels
//!
//! - `warn`: unrecognized fragments, rejected viewer operations
//! - `info`: feed loaded, page written
//! - `debug`: every viewer transition and synchronizer decision
//! - `trace`: raw fragment changes in the history
//!
//! `RUST_LOG` overrides the configured level entirely.

use crate::config::{LogFormat, LoggingConfig};
use std::io;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Effective settings after applying CLI verbosity to the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub with_ansi: bool,
}

impl LogSettings {
    /// `-v` raises the configured level to at least `debug`, `-vv` to `trace`.
    #[must_use]
    pub fn resolve(config: &LoggingConfig, verbosity: u8) -> Self {
        let configured = config.level.parse().unwrap_or(Level::INFO);
        let level = match verbosity {
            0 => configured,
            1 => configured.max(Level::DEBUG),
            _ => Level::TRACE,
        };
        Self {
            level,
            format: config.format,
            with_ansi: config.format != LogFormat::Json,
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_logging(settings: &LogSettings) -> Result<(), TryInitError> {
    init_logging_with_writer(settings, io::stderr)
}

pub fn init_logging_with_writer<W>(settings: &LogSettings, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(settings.level);
    let registry = tracing_subscriber::registry().with(filter);

    match settings.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_target(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(settings.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(settings.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
    }
}

/// Our crate logs at `level`; dependencies stay at `warn`.
fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,dummybook={level}")))
}
