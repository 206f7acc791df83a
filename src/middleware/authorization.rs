//! Bearer-token authorization.
//!
//! Without a configured key the stage lets everything through. With one,
//! requests outside the exempt paths must present
//! `authorization: Bearer <key>` or are answered with `401` on the spot.
//! The token is compared in constant time.

use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderValue, StatusCode};
use subtle::ConstantTimeEq;
use tracing::Level;

use super::{Middleware, Next};
use crate::config::AuthSettings;
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::response::Response;
use crate::telemetry::SharedSink;

pub struct Authorization {
    sink: SharedSink,
    api_key: Option<String>,
    exempt: Vec<String>,
}

impl Authorization {
    const SOURCE: &'static str = "authorization";

    /// Admits every request.
    pub fn anonymous(sink: SharedSink) -> Self {
        Self { sink, api_key: None, exempt: Vec::new() }
    }

    /// Requires `Bearer <api_key>` on every non-exempt request.
    pub fn bearer(sink: SharedSink, api_key: impl Into<String>) -> Self {
        Self { sink, api_key: Some(api_key.into()), exempt: Vec::new() }
    }

    pub fn from_settings(sink: SharedSink, settings: &AuthSettings) -> Self {
        match &settings.api_key {
            Some(key) => Self::bearer(sink, key.clone()),
            None => Self::anonymous(sink),
        }
    }

    /// Paths admitted without credentials (exact match).
    pub fn exempt<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt.extend(paths.into_iter().map(Into::into));
        self
    }

    fn admits(&self, req: &Request) -> bool {
        let Some(key) = &self.api_key else {
            return true;
        };
        if self.exempt.iter().any(|p| p == req.path()) {
            return true;
        }
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token.as_bytes().ct_eq(key.as_bytes()).unwrap_u8() == 1)
    }
}

impl Middleware for Authorization {
    fn name(&self) -> &'static str {
        Self::SOURCE
    }

    fn handle<'a>(&'a self, req: Request, next: Next) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            if self.admits(&req) {
                return next.run(req).await;
            }

            self.sink.record(
                Level::WARN,
                Self::SOURCE,
                &format!("Rejected {}: missing or invalid bearer token", req.path()),
            );
            let mut res = Response::status(StatusCode::UNAUTHORIZED);
            res.set_header(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            Ok(res)
        })
    }
}
