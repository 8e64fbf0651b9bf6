//! Error types and the status-code mapping point.
//!
//! Two concerns, two types. [`Error`] surfaces infrastructure failures —
//! binding a port, accepting a connection. [`UserError`] is the domain
//! taxonomy raised by the store; its [`IntoResponse`] impl is the single
//! place a domain failure turns into an HTTP status and body.

use thiserror::Error as ThisError;

use crate::response::{IntoResponse, Response};

/// Infrastructure error returned by [`Server::serve`](crate::Server::serve).
///
/// Application-level failures (404, 400, 500) are expressed as HTTP
/// responses, never as this type.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure raised by a store operation.
///
/// Fail-fast: raised at the point of detection, before any mutation, and
/// propagated with `?` up to the mapping point below. Nothing in between
/// recovers or retries.
#[derive(Debug, ThisError)]
pub enum UserError {
    /// No record matches the requested id.
    #[error("user not found")]
    NotFound,

    /// Submitted input failed validation. The message is reused verbatim
    /// as the response body.
    #[error("{0}")]
    Form(String),

    /// A caller broke an internal contract. Bad code, not bad input —
    /// mapped to 500, never to 400.
    #[error("{0}")]
    Contract(&'static str),

    /// JSON (de)serialization failed during handling.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl UserError {
    /// Shorthand for a validation failure with the given message.
    pub fn form(message: impl Into<String>) -> Self {
        Self::Form(message.into())
    }
}

impl PartialEq for UserError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound, Self::NotFound) => true,
            (Self::Form(a), Self::Form(b)) => a == b,
            (Self::Contract(a), Self::Contract(b)) => a == b,
            _ => false,
        }
    }
}

/// The mapping point: one domain error, one status code, one body.
///
/// Unanticipated kinds collapse to a generic 500 — no internal detail
/// leaks into the response.
impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => Response::builder()
                .status(http::StatusCode::NOT_FOUND)
                .text("User not found"),
            Self::Form(message) => Response::builder()
                .status(http::StatusCode::BAD_REQUEST)
                .text(message),
            Self::Contract(_) | Self::Json(_) => Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .text("Internal server error"),
        }
    }
}

/// Lets handlers return `Result<Response, UserError>` and have the error
/// arm routed through the mapping point automatically.
impl IntoResponse for Result<Response, UserError> {
    fn into_response(self) -> Response {
        match self {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}
