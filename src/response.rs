//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. That is the entire
//! job description. The conversion into hyper's response type happens once,
//! in the dispatch path.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use roster::Response;
///
/// Response::json(br#"{"id":"1"}"#.to_vec());
/// Response::text("hello");
/// Response::status(http::StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use roster::Response;
///
/// Response::builder()
///     .status(http::StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":"42"}"#.to_vec());
/// ```
pub struct Response {
    body: Vec<u8>,
    headers: Vec<(String, String)>,
    status: StatusCode,
}

impl Response {
    /// `200 OK` — `application/json`.
    ///
    /// Takes bytes straight from the serialiser: `serde_json::to_vec(&val)?`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::with_content_type("application/json", body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content_type("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Response with the given status and no body.
    pub fn status(status: StatusCode) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: StatusCode::OK }
    }

    /// The response status code.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// The response body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn with_content_type(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            body,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            status: StatusCode::OK,
        }
    }

    /// Converts into the hyper response handed back on the wire.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Headers and status originate in this crate; the build cannot fail.
        builder
            .body(Full::new(Bytes::from(self.body)))
            .expect("well-formed response")
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Defaults to `200 OK`; terminated by a
/// typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json", body)
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish("text/plain; charset=utf-8", body.into().into_bytes())
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for [`Response`] itself and, in
/// [`error`](crate::UserError), for the domain error and the `Result`
/// shape handlers return — the dispatch path normalises whichever one it
/// gets.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}
