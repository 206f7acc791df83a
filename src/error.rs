//! Unified error type.

/// A fault raised by a stage or handler while producing a response.
///
/// The pipeline never inspects it: stages pass it upstream untouched, and the
/// server turns whatever reaches it into a `500`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by ledgerline's fallible startup operations.
///
/// Application-level errors (404, 401, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, and request-time faults travel as
/// [`BoxError`]. This type surfaces infrastructure failures: loading settings,
/// installing the log subscriber, assembling the pipeline, binding to a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid bind address `{addr}`: {source}")]
    BindAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("pipeline has no terminal stage")]
    MissingTerminal,
}
