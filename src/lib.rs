//! # roster
//!
//! A minimal user CRUD API over HTTP. Records live in process memory.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! One store, one router, one error-mapping point. The store owns the
//! record collection and every validation rule; the routing layer binds
//! verbs and paths to store operations and translates domain errors into
//! status codes. Anything the router does not know about gets a plain
//! `404 Endpoint not found`.
//!
//! | Verb | Path | Outcome |
//! |---|---|---|
//! | GET | `/users` | `200` — all records |
//! | GET | `/users/{id}` | `200` — one record |
//! | POST | `/users` | `201` — created record |
//! | PATCH | `/users/{id}` | `200` — updated record |
//! | DELETE | `/users/{id}` | `204` — no body |
//!
//! What roster intentionally skips: persistence, authentication,
//! pagination, rate limiting. The records exist for the life of the
//! process and not a second longer.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roster::{routes, Server, UserStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(UserStore::new());
//!     let app = routes::router(store);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod store;
mod user;

pub mod health;
pub mod routes;

pub use error::{Error, UserError};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use store::UserStore;
pub use user::{User, UserForm};
