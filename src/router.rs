//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is the
//! terminal stage of the pipeline: it implements [`Endpoint`] and is handed
//! to [`PipelineBuilder::terminal`](crate::middleware::PipelineBuilder::terminal).

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedEndpoint, Endpoint, Handler, Outcome};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup and install it as the pipeline's terminal.
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedEndpoint>>,
}

/// Result of a route lookup.
pub(crate) enum Lookup {
    Found(BoxedEndpoint, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use ledgerline::{Method, Request, Response, Router};
    /// # async fn one(_: Request) -> Response { Response::text("") }
    /// # async fn all(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/accounts",      all)
    ///     .on(Method::Get, "/accounts/{id}", one);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting path. Routes are registered at
    /// startup, so this surfaces before the server accepts traffic.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_endpoint())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub(crate) fn lookup(&self, method: &http::Method, path: &str) -> Lookup {
        let found = Method::from_http(method)
            .and_then(|m| self.routes.get(&m))
            .and_then(|tree| tree.at(path).ok());

        if let Some(matched) = found {
            let endpoint = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(endpoint, params);
        }

        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl Endpoint for Router {
    fn call(&self, mut req: Request) -> BoxFuture<'static, Outcome> {
        match self.lookup(req.method(), req.path()) {
            Lookup::Found(endpoint, params) => {
                req.set_params(params);
                endpoint.call(req)
            }
            Lookup::MethodNotAllowed => {
                Box::pin(async { Ok(Response::status(StatusCode::METHOD_NOT_ALLOWED)) })
            }
            Lookup::NotFound => {
                Box::pin(async { Ok(Response::status(StatusCode::NOT_FOUND)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    fn router() -> Router {
        Router::new()
            .get("/accounts/{id}", echo_id)
            .post("/accounts", |_req: Request| async { StatusCode::CREATED })
    }

    #[tokio::test]
    async fn dispatches_with_path_params() {
        let res = router()
            .call(Request::new(http::Method::GET, "/accounts/42"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let res = router()
            .call(Request::new(http::Method::GET, "/nope"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn known_path_with_other_method_is_not_allowed() {
        let res = router()
            .call(Request::new(http::Method::DELETE, "/accounts/1"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);

        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        let res = router().call(Request::new(purge, "/accounts")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic_at_registration() {
        let _ = Router::new()
            .get("/accounts/{id}", echo_id)
            .get("/accounts/{name}", echo_id);
    }
}
