//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

/// An incoming HTTP request with its body already collected.
///
/// roster does not touch the body bytes — parse them however you like
/// (`serde_json::from_slice` for this service's JSON forms).
pub struct Request {
    parts: http::request::Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { parts, body, params }
    }

    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
