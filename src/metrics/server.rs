//! Prometheus Metrics HTTP Server
//!
//! Serves `GET /metrics` and `GET /health` on a listener separate from the
//! upload server.
//!
//! # Example
//!
//! ```no_run
//! use disk_uploadr::metrics::server::MetricsServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = MetricsServer::new("127.0.0.1:9090");
//!     let addr = server.start().await?;
//!     println!("Metrics server listening on {}", addr);
//!     Ok(())
//! }
//! ```

use crate::response::{self, Body};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::{Encoder, TextEncoder};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Metrics server error
#[derive(Debug, thiserror::Error)]
pub enum MetricsServerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Prometheus metrics HTTP server
pub struct MetricsServer {
    address: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl MetricsServer {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            shutdown_tx: None,
            server_handle: None,
        }
    }

    /// Start the metrics server in a background task
    ///
    /// Returns the actual bound address (useful when using port 0)
    pub async fn start(&mut self) -> Result<SocketAddr, MetricsServerError> {
        let listener = TcpListener::bind(&self.address).await?;
        let addr = listener.local_addr()?;
        info!("Metrics server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);
        self.server_handle = Some(tokio::spawn(run_server(listener, shutdown_rx)));

        Ok(addr)
    }

    /// Stop accepting connections and wait for the accept loop to exit
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
    }
}

async fn run_server(listener: TcpListener, mut shutdown_rx: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        tokio::spawn(async move {
                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service_fn(handle_request))
                                .await
                            {
                                debug!("Metrics connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => warn!("Failed to accept metrics connection: {}", e),
                }
            }
        }
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Body>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => metrics_handler(),
        (&Method::GET, "/health") => response::text(StatusCode::OK, "ok"),
        _ => response::not_found(),
    };
    Ok(response)
}

/// Encode every registered metric in the Prometheus text format
fn metrics_handler() -> Response<Body> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return response::text(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        );
    }

    response::with_content_type(StatusCode::OK, prometheus::TEXT_FORMAT, buffer)
}
