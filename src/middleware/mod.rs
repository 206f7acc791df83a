//! Middleware pipeline.
//!
//! A pipeline is an ordered chain of stages wrapped around one terminal
//! endpoint (normally the [`Router`](crate::Router)). It is assembled once at
//! startup by [`PipelineBuilder`] and is immutable afterwards, so a single
//! [`Pipeline`] is shared by every connection without locking.
//!
//! ```text
//!   request ──▶ Cors ──▶ Authorization ──▶ RequestLogging ──▶ Router
//!   outcome ◀──  ·   ◀──       ·       ◀──        ·       ◀──   ·
//! ```
//!
//! Each stage receives the request together with a [`Next`] handle to the
//! rest of the chain. It may annotate the request, call `next.run(req)`
//! exactly once, and inspect or amend the outcome on the way back out; or it
//! may answer on its own without calling `next` at all. Because the "after"
//! half of a stage runs only once its downstream call has returned, stage
//! order alone fixes both the inbound and the unwind order.
//!
//! Faults ([`BoxError`](crate::BoxError)) travel back out through every
//! stage. A stage that turns faults into responses has to sit outside the
//! stages whose faults it should see.

mod authorization;
mod cors;
mod logging;

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedEndpoint, Endpoint, Handler, Outcome};
use crate::request::Request;
use crate::telemetry::SharedSink;

pub use authorization::Authorization;
pub use cors::Cors;
pub use logging::RequestLogging;

// ── Middleware ────────────────────────────────────────────────────────────────

/// One stage of the pipeline.
///
/// Stages are shared by all in-flight requests, so per-request state lives in
/// the future returned by `handle`, never in `self`.
pub trait Middleware: Send + Sync + 'static {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    fn handle<'a>(&'a self, req: Request, next: Next) -> BoxFuture<'a, Outcome>;
}

/// Builds a stage from an async closure.
///
/// ```rust
/// use ledgerline::middleware::{from_fn, Next};
/// use ledgerline::Request;
///
/// let stamp = from_fn("stamp", |mut req: Request, next: Next| async move {
///     req.extensions_mut().insert(std::time::Instant::now());
///     next.run(req).await
/// });
/// ```
pub fn from_fn<F, Fut>(name: &'static str, f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    FromFn { name, f }
}

/// Stage returned by [`from_fn`].
pub struct FromFn<F> {
    name: &'static str,
    f: F,
}

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, req: Request, next: Next) -> BoxFuture<'a, Outcome> {
        Box::pin((self.f)(req, next))
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// A node of the frozen chain: either a stage and what follows it, or the
/// terminal endpoint.
enum Link {
    Stage {
        stage: Arc<dyn Middleware>,
        next: Arc<Link>,
    },
    Terminal(BoxedEndpoint),
}

impl Link {
    fn dispatch(&self, req: Request) -> BoxFuture<'static, Outcome> {
        match self {
            Link::Terminal(endpoint) => endpoint.call(req),
            Link::Stage { stage, next } => {
                let stage = Arc::clone(stage);
                let next = Next { link: Arc::clone(next) };
                Box::pin(async move { stage.handle(req, next).await })
            }
        }
    }
}

/// The remainder of the pipeline, as seen from inside a stage.
///
/// `run` consumes the handle, so downstream is entered at most once per
/// stage invocation.
pub struct Next {
    link: Arc<Link>,
}

impl Next {
    /// Hands the request to the next stage and waits for its outcome.
    pub async fn run(self, req: Request) -> Outcome {
        self.link.dispatch(req).await
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// The composed, immutable entry point. Cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
    head: Arc<Link>,
    stages: Arc<[&'static str]>,
}

impl Pipeline {
    pub fn builder(sink: SharedSink) -> PipelineBuilder {
        PipelineBuilder::new(sink)
    }

    /// Runs one request through every stage and the terminal.
    pub fn handle(&self, req: Request) -> BoxFuture<'static, Outcome> {
        self.head.dispatch(req)
    }

    /// Stage names, outermost first. The terminal is not listed.
    pub fn stage_names(&self) -> &[&'static str] {
        &self.stages
    }
}

impl Endpoint for Pipeline {
    fn call(&self, req: Request) -> BoxFuture<'static, Outcome> {
        self.handle(req)
    }
}

// ── PipelineBuilder ───────────────────────────────────────────────────────────

/// Assembles a [`Pipeline`] at startup.
///
/// Stages are added outermost first. The builder owns the log sink and hands
/// it to every constructor passed to [`stage_with`](Self::stage_with).
pub struct PipelineBuilder {
    sink: SharedSink,
    stages: Vec<Arc<dyn Middleware>>,
    terminal: Option<BoxedEndpoint>,
}

impl PipelineBuilder {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink, stages: Vec::new(), terminal: None }
    }

    /// Appends a ready-made stage inside the ones added so far.
    pub fn stage(mut self, stage: impl Middleware) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Appends a stage built from the builder's log sink.
    pub fn stage_with<M, F>(self, make: F) -> Self
    where
        M: Middleware,
        F: FnOnce(SharedSink) -> M,
    {
        let stage = make(Arc::clone(&self.sink));
        self.stage(stage)
    }

    /// Sets the innermost endpoint. A later call replaces an earlier one.
    pub fn terminal(mut self, endpoint: impl Endpoint) -> Self {
        self.terminal = Some(Arc::new(endpoint));
        self
    }

    /// Sets a plain handler function as the innermost endpoint.
    pub fn terminal_fn(mut self, handler: impl Handler) -> Self {
        self.terminal = Some(handler.into_endpoint());
        self
    }

    /// Freezes the chain.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTerminal`] if no terminal was set.
    pub fn build(self) -> Result<Pipeline, Error> {
        let terminal = self.terminal.ok_or(Error::MissingTerminal)?;
        let names: Arc<[&'static str]> = self.stages.iter().map(|s| s.name()).collect();

        let head = self.stages.into_iter().rev().fold(
            Arc::new(Link::Terminal(terminal)),
            |next, stage| Arc::new(Link::Stage { stage, next }),
        );

        debug!(stages = ?names, "pipeline built");
        Ok(Pipeline { head, stages: names })
    }
}
