//! Handler trait, the terminal [`Endpoint`] capability, and type erasure.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* types in a single
//! `HashMap<Method, Tree>`, and the pipeline holds whatever sits at its
//! innermost position. Both store them as trait objects
//! (`Arc<dyn Endpoint>`):
//!
//! ```text
//! async fn balances(req: Request) -> Json<Graph> { … }   ← user writes this
//!        ↓ router.get("/balances", balances)
//! balances.into_endpoint()                             ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(balances))                        ← heap-allocated wrapper
//!        ↓  stored as BoxedEndpoint = Arc<dyn Endpoint>
//! endpoint.call(req)  at request time                  ← one vtable dispatch
//!        ↓
//! Box::pin(async { balances(req).await.into_outcome() })  ← BoxFuture
//! ```
//!
//! Every endpoint resolves to an [`Outcome`]: a response, or a fault that
//! travels back up through the pipeline unchanged.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;

use crate::error::BoxError;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};

// ── Core types ────────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future.
///
/// `Send` lets tokio move the future across worker threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What every stage and endpoint eventually produces.
pub type Outcome = Result<Response, BoxError>;

/// The terminal dispatcher capability: accept a request, produce an eventual
/// response or raise a fault.
///
/// [`Router`](crate::Router) implements it, every [`Handler`] converts into
/// it, and tests implement it directly to stand in for business logic.
pub trait Endpoint: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture<'static, Outcome>;
}

/// A type-erased endpoint shared across concurrent requests.
pub type BoxedEndpoint = Arc<dyn Endpoint>;

// ── HandlerOutput ─────────────────────────────────────────────────────────────

/// Values a handler may return.
///
/// Plain responses always succeed. `Result<T, E>` lets a handler raise a
/// fault with `?`; the error is boxed and handed to the pipeline as is.
pub trait HandlerOutput: Send + 'static {
    fn into_outcome(self) -> Outcome;
}

macro_rules! infallible_output {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HandlerOutput for $ty {
                fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
            }
        )*
    };
}

infallible_output!(Response, &'static str, String, StatusCode);

impl<T: Serialize + Send + 'static> HandlerOutput for Json<T> {
    fn into_outcome(self) -> Outcome {
        self.try_into_response()
    }
}

impl<T, E> HandlerOutput for Result<T, E>
where
    T: HandlerOutput,
    E: Into<BoxError> + Send + 'static,
{
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(out) => out.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied for any function or closure with the shape:
///
/// ```text
/// async fn name(req: Request) -> impl HandlerOutput
/// ```
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_endpoint(self) -> BoxedEndpoint;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput,
{
    fn into_endpoint(self) -> BoxedEndpoint {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype bridging a concrete handler `F` into the [`Endpoint`] trait object.
struct FnHandler<F>(F);

impl<F, Fut, R> Endpoint for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput,
{
    fn call(&self, req: Request) -> BoxFuture<'static, Outcome> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_outcome() })
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use http::Method;

    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[tokio::test]
    async fn plain_handler_becomes_successful_endpoint() {
        let ep = (|_req: Request| async { "hi" }).into_endpoint();
        let res = ep.call(Request::new(Method::GET, "/")).await.unwrap();
        assert_eq!(res.body(), b"hi");
    }

    #[tokio::test]
    async fn fallible_handler_raises_its_error() {
        let ep = (|_req: Request| async { Err::<Response, _>(Boom) }).into_endpoint();
        let err = ep.call(Request::new(Method::GET, "/")).await.unwrap_err();
        assert!(err.downcast_ref::<Boom>().is_some());
    }

    #[tokio::test]
    async fn status_code_is_a_valid_output() {
        let ep = (|_req: Request| async { StatusCode::NO_CONTENT }).into_endpoint();
        let res = ep.call(Request::new(Method::DELETE, "/x")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
    }
}
