//! Incoming HTTP request type.
//!
//! A [`Request`] is the per-request context threaded through the pipeline.
//! The server creates it once the head and body have been read and drops it
//! when the response is written. Stages may read it, annotate it through
//! [`Request::extensions_mut`], and hand it on to [`Next`](crate::middleware::Next).

use std::collections::HashMap;

use bytes::Bytes;
use http::{Extensions, HeaderMap, HeaderValue, Method};

/// An incoming HTTP request with its body fully buffered.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,
}

impl Request {
    /// Builds a request by hand. The server uses this for every inbound
    /// request; tests use it to drive a pipeline without a socket.
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((p, q)) => (p.to_owned(), Some(q.to_owned())),
            None => (uri.to_owned(), None),
        };
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Adds a header. `name` must be a lowercase header name; values that are
    /// not valid header text are ignored.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(v) = HeaderValue::from_str(value) {
            self.headers.append(name, v);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            params: HashMap::new(),
            extensions: parts.extensions,
        }
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/accounts/{id}`, `req.param("id")` on `/accounts/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Typed values attached by earlier stages.
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_query_from_path() {
        let req = Request::new(Method::GET, "/api/Transaction/GetLast12MonthBalances?x=1");
        assert_eq!(req.path(), "/api/Transaction/GetLast12MonthBalances");
        assert_eq!(req.query(), Some("x=1"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::GET, "/").with_header("authorization", "Bearer abc");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.header("origin"), None);
    }

    #[test]
    fn extensions_carry_annotations() {
        #[derive(Clone, Debug, PartialEq)]
        struct Caller(&'static str);

        let mut req = Request::new(Method::GET, "/");
        req.extensions_mut().insert(Caller("dashboard"));
        assert_eq!(req.extensions().get::<Caller>(), Some(&Caller("dashboard")));
    }
}
