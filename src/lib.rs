//! # ledgerline
//!
//! Twelve months of account balances, served as line-graph JSON through an
//! ordered request pipeline.
//!
//! ## The pipeline
//!
//! Every request passes through the same chain of stages, assembled once at
//! startup and frozen before the server accepts traffic:
//!
//! - **Cors**: answers preflights, tags responses for allowed origins
//! - **Authorization**: optional bearer token
//! - **RequestLogging**: `Entering {path}` / `Leaving {path}`, or the fault
//!   message when the inner stages fail; faults are re-raised untouched
//! - **Router**: radix-tree dispatch into the handlers, via [`matchit`]
//!
//! See [`middleware`] for the composition model.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ledgerline::middleware::{Pipeline, RequestLogging};
//! use ledgerline::telemetry::TracingSink;
//! use ledgerline::{Json, Request, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ledgerline::Error> {
//!     let router = Router::new().get("/accounts/{id}", get_account);
//!
//!     let pipeline = Pipeline::builder(TracingSink::shared())
//!         .stage_with(RequestLogging::new)
//!         .terminal(router)
//!         .build()?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(pipeline).await
//! }
//!
//! async fn get_account(req: Request) -> Json<String> {
//!     Json(req.param("id").unwrap_or("unknown").to_owned())
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod app;
pub mod balance;
pub mod config;
pub mod health;
pub mod middleware;
pub mod telemetry;

pub use error::{BoxError, Error};
pub use handler::{BoxFuture, BoxedEndpoint, Endpoint, Handler, HandlerOutput, Outcome};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, respond, serve_with_shutdown};
