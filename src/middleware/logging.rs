//! Request logging and fault observation.
//!
//! Per request: an info record `Entering {path}` before the downstream call,
//! then either `Leaving {path}` or one error record carrying the fault's
//! message. The downstream outcome is returned untouched in both cases; a
//! fault is re-raised as the very same value.

use tracing::Level;

use super::{Middleware, Next};
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::telemetry::SharedSink;

/// Logs entry and exit around the rest of the pipeline.
pub struct RequestLogging {
    sink: SharedSink,
}

impl RequestLogging {
    /// Source name attached to every record this stage emits.
    pub const SOURCE: &'static str = "request_logging";

    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Middleware for RequestLogging {
    fn name(&self) -> &'static str {
        Self::SOURCE
    }

    fn handle<'a>(&'a self, req: Request, next: Next) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let path = req.path().to_owned();
            self.sink.record(Level::INFO, Self::SOURCE, &format!("Entering {path}"));

            match next.run(req).await {
                Ok(res) => {
                    self.sink.record(Level::INFO, Self::SOURCE, &format!("Leaving {path}"));
                    Ok(res)
                }
                Err(e) => {
                    self.sink.record(Level::ERROR, Self::SOURCE, &e.to_string());
                    Err(e)
                }
            }
        })
    }
}
