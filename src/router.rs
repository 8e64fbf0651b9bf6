//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. You
//! register a path, you get a handler. That is all. Anything that does not
//! match falls through to the server's catch-all 404.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so calls chain naturally. Path
/// parameters use `{name}` syntax and are retrieved with
/// [`Request::param`](crate::Request::param).
///
/// ```rust,no_run
/// # use roster::{Request, Response, Router};
/// # async fn list_users(_: Request) -> Response { Response::text("") }
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .get("/users", list_users)
///     .get("/users/{id}", get_user)
///     .post("/users", create_user);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Register a handler for an arbitrary method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern. Routes are registered
    /// at startup; a malformed pattern is a build error, not a runtime one.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
