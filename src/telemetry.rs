//! Logging capability handed to pipeline stages, and process-wide tracing setup.
//!
//! Stages never reach for a global logger. The pipeline builder owns an
//! `Arc<dyn LogSink>` and passes it to each stage constructor, so a test can
//! swap in a sink that simply remembers what it was given.

use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LogSettings};
use crate::error::Error;

/// Accepts leveled text records tagged with a logical source name.
pub trait LogSink: Send + Sync + 'static {
    fn record(&self, level: Level, source: &'static str, message: &str);
}

/// Shared handle to a log sink.
pub type SharedSink = Arc<dyn LogSink>;

/// Forwards records to the `tracing` dispatcher, with `source` as a field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn shared() -> SharedSink {
        Arc::new(Self)
    }
}

impl LogSink for TracingSink {
    fn record(&self, level: Level, source: &'static str, message: &str) {
        // tracing needs the level at compile time
        match level {
            Level::ERROR => tracing::error!(source, "{message}"),
            Level::WARN  => tracing::warn!(source, "{message}"),
            Level::INFO  => tracing::info!(source, "{message}"),
            Level::DEBUG => tracing::debug!(source, "{message}"),
            _            => tracing::trace!(source, "{message}"),
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Fails if a global
/// subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.format {
        LogFormat::Json => builder.json().finish().try_init()?,
        LogFormat::Pretty => builder.finish().try_init()?,
    }
    Ok(())
}
