//! roster — an in-memory user CRUD API.
//!
//! Try:
//!   curl http://localhost:3000/users
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"John","email":"john@domain.com"}'
//!   curl -X PATCH http://localhost:3000/users/1 -d '{"name":"Jim"}'
//!   curl -X DELETE http://localhost:3000/users/1

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use roster::{Server, UserStore, health, routes};

/// A minimal in-memory user CRUD API over HTTP.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "ROSTER_LISTEN", default_value = "0.0.0.0:3000")]
    listen: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(UserStore::new());
    let app = routes::router(store)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness);

    if let Err(e) = Server::bind(&args.listen).serve(app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
