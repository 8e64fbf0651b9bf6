//! HTTP server, request dispatch, and graceful shutdown.
//!
//! The server stops accepting on the first SIGTERM or Ctrl-C, lets every
//! in-flight connection run to completion, then returns from
//! [`Server::serve`] so `main` can exit cleanly.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Binds the listener and starts accepting connections.
    ///
    /// Returns only after a full graceful shutdown.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        Self::run(listener, router).await
    }

    /// Serves on an already-bound listener.
    ///
    /// Split out from [`serve`](Server::serve) so callers — integration
    /// tests in particular — can bind to port 0 and read the assigned
    /// address before the server starts.
    pub async fn run(listener: TcpListener, router: Router) -> Result<(), Error> {
        // Shared across concurrent connection tasks without copying the
        // routing table.
        let router = Arc::new(router);

        info!(addr = %listener.local_addr()?, "roster listening");

        // JoinSet tracks every spawned connection task so shutdown can wait
        // for them all.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM immediately stops
                // accepting, even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not
                        // once per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req, remote_addr).await }
                        });

                        // Serves HTTP/1.1 or HTTP/2, whatever the client
                        // negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks so the set does not grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("roster stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: routes one request and produces one response.
///
/// The error type is [`Infallible`](std::convert::Infallible) — every
/// failure becomes an HTTP response here, hyper never sees an error. An
/// unmatched verb+path pair, `PUT /users/1` as much as `/nonsense`, gets
/// the catch-all 404.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let response = match router.lookup(&method, &path) {
        Some((handler, params)) => match body.collect().await {
            Ok(collected) => {
                let request = Request::new(parts, collected.to_bytes(), params);
                handler.call(request).await
            }
            Err(e) => {
                error!(peer = %remote_addr, "body read error: {e}");
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .text("Internal server error")
            }
        },
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .text("Endpoint not found"),
    };

    debug!(%method, %path, status = %response.status_code(), "request");
    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both SIGTERM and SIGINT (Ctrl-C). On Windows
/// only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
