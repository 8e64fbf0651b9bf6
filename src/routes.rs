//! `/users` routes.
//!
//! Binds HTTP verbs and paths to store operations and serializes results as
//! JSON. Handlers return `Result<Response, UserError>`; the error arm goes
//! through the mapping point in [`error`](crate::error), so a failure inside
//! a matched handler always comes back as a mapped status, never as a raw
//! 500 from the plumbing. Unmatched verb+path pairs never reach this module
//! — the server's catch-all answers those.

use std::future::Future;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::UserError;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::store::{Form, UserStore};

/// Builds the `/users` router over a shared store.
pub fn router(store: Arc<UserStore>) -> Router {
    Router::new()
        .get("/users", with_store(&store, list_users))
        .get("/users/{id}", with_store(&store, get_user))
        .post("/users", with_store(&store, create_user))
        .patch("/users/{id}", with_store(&store, update_user))
        .delete("/users/{id}", with_store(&store, delete_user))
}

/// Adapts a `(store, request)` handler into the router's `(request)` shape
/// by capturing the store and cloning the `Arc` per call.
fn with_store<H, Fut>(
    store: &Arc<UserStore>,
    handler: H,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    H: Fn(Arc<UserStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, UserError>> + Send + 'static,
{
    let store = Arc::clone(store);
    move |req| handler(Arc::clone(&store), req)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /users` → 200 with the full collection.
async fn list_users(store: Arc<UserStore>, _req: Request) -> Result<Response, UserError> {
    Ok(Response::json(serde_json::to_vec(&store.list())?))
}

/// `GET /users/{id}` → 200 with one record.
async fn get_user(store: Arc<UserStore>, req: Request) -> Result<Response, UserError> {
    let user = store.get(route_id(&req)?)?;
    Ok(Response::json(serde_json::to_vec(&user)?))
}

/// `POST /users` → 201 with the created record.
async fn create_user(store: Arc<UserStore>, req: Request) -> Result<Response, UserError> {
    let form = parse_form(&req)?;
    let user = store.create(&form)?;
    debug!(id = %user.id, "user created");
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .json(serde_json::to_vec(&user)?))
}

/// `PATCH /users/{id}` → 200 with the updated record.
async fn update_user(store: Arc<UserStore>, req: Request) -> Result<Response, UserError> {
    let id = route_id(&req)?;
    let form = parse_form(&req)?;
    let user = store.update(id, &form)?;
    debug!(id = %user.id, "user updated");
    Ok(Response::json(serde_json::to_vec(&user)?))
}

/// `DELETE /users/{id}` → 204, no body.
async fn delete_user(store: Arc<UserStore>, req: Request) -> Result<Response, UserError> {
    let id = route_id(&req)?;
    store.delete(id)?;
    debug!(id, "user deleted");
    Ok(Response::status(StatusCode::NO_CONTENT))
}

/// The `{id}` route parameter. Its absence means a route was registered
/// without the parameter — a wiring bug, not user input.
fn route_id(req: &Request) -> Result<&str, UserError> {
    req.param("id")
        .ok_or(UserError::Contract("route registered without an id parameter"))
}

/// Parses the request body into a form.
///
/// An empty body is an empty form, and so is a well-formed body that is not
/// a JSON object — the store's presence checks reject both with a field
/// message. Malformed JSON is an unexpected failure and surfaces as a 500.
fn parse_form(req: &Request) -> Result<Form, UserError> {
    if req.body().is_empty() {
        return Ok(Form::new());
    }
    match serde_json::from_slice::<Value>(req.body())? {
        Value::Object(map) => Ok(map),
        _ => Ok(Form::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;

    fn request(body: &str) -> Request {
        let (parts, ()) = http::Request::builder()
            .method("POST")
            .uri("/users")
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::copy_from_slice(body.as_bytes()), HashMap::new())
    }

    #[test]
    fn empty_body_parses_to_an_empty_form() {
        assert_eq!(parse_form(&request("")).unwrap(), Form::new());
    }

    #[test]
    fn non_object_body_parses_to_an_empty_form() {
        assert_eq!(parse_form(&request("[1, 2]")).unwrap(), Form::new());
        assert_eq!(parse_form(&request("\"jim\"")).unwrap(), Form::new());
    }

    #[test]
    fn malformed_body_is_an_unexpected_error() {
        let err = parse_form(&request("{not json")).unwrap_err();
        assert!(matches!(err, UserError::Json(_)));
    }

    #[test]
    fn missing_route_param_is_a_contract_violation() {
        let err = route_id(&request("")).unwrap_err();
        assert!(matches!(err, UserError::Contract(_)));
    }
}
