//! Cross-origin resource sharing.
//!
//! Browsers serving the dashboard from another origin need
//! `access-control-allow-origin` on every API response, and an answer to the
//! `OPTIONS` preflight they send before non-simple requests. Preflights are
//! answered here and never reach the inner stages.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    VARY,
};
use http::{HeaderValue, Method, StatusCode};

use super::{Middleware, Next};
use crate::config::CorsSettings;
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::response::Response;

const ALLOWED_METHODS: &str = "GET, OPTIONS";
const MAX_AGE_SECS: &str = "600";

enum Origins {
    Any,
    List(Vec<String>),
}

/// Adds CORS headers for allowed origins and answers preflights.
pub struct Cors {
    origins: Origins,
}

impl Cors {
    /// Allows exactly the given origins. A `"*"` entry allows any origin.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = origins.into_iter().map(Into::into).collect();
        let origins = if list.iter().any(|o| o == "*") {
            Origins::Any
        } else {
            Origins::List(list)
        };
        Self { origins }
    }

    pub fn from_settings(settings: &CorsSettings) -> Self {
        Self::new(settings.allowed_origins.iter().cloned())
    }

    /// The `access-control-allow-origin` value for a request origin, if allowed.
    fn allow_origin(&self, origin: &HeaderValue) -> Option<HeaderValue> {
        match &self.origins {
            Origins::Any => Some(HeaderValue::from_static("*")),
            Origins::List(list) => {
                let origin_str = origin.to_str().ok()?;
                list.iter().any(|o| o == origin_str).then(|| origin.clone())
            }
        }
    }
}

impl Middleware for Cors {
    fn name(&self) -> &'static str {
        "cors"
    }

    fn handle<'a>(&'a self, req: Request, next: Next) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let allowed = req.headers().get(ORIGIN).and_then(|o| self.allow_origin(o));

            let preflight = req.method() == Method::OPTIONS
                && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);

            if preflight {
                let mut res = Response::status(StatusCode::NO_CONTENT);
                if let Some(origin) = allowed {
                    res.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
                    res.set_header(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
                    res.set_header(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
                    if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
                        res.set_header(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
                    }
                    res.set_header(VARY, HeaderValue::from_static("origin"));
                }
                return Ok(res);
            }

            let mut res = next.run(req).await?;
            if let Some(origin) = allowed {
                res.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
                res.set_header(VARY, HeaderValue::from_static("origin"));
            }
            Ok(res)
        })
    }
}
