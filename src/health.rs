//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | Liveness | `/healthz` | Is the process alive? |
//! | Readiness | `/readyz` | Can it serve traffic? |
//!
//! The binary registers both next to the `/users` routes. Everything here
//! is stateless — an in-memory store is ready the moment it exists.

use crate::{Request, Response};

/// Liveness probe handler. Always `200 OK` with body `"ok"` — if the
/// process can respond to HTTP at all, it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler. Always `200 OK` with body `"ready"`; there are
/// no dependencies to wait on.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
