//! HTTP server module
//!
//! Accepts TCP connections and serves each one on its own tokio task with
//! hyper's HTTP/1.1 connection driver. Requests are answered by a shared
//! [`Router`].
//!
//! # Example
//!
//! ```no_run
//! use disk_uploadr::router::Router;
//! use disk_uploadr::config::StorageConfig;
//! use disk_uploadr::server::Server;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::from_config(&StorageConfig::default());
//! let server = Server::new("127.0.0.1:0", router).await?;
//! println!("Server bound to: {}", server.local_addr());
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;

use crate::router::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, Instrument};

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(String),

    #[error("Upload directory {path} is not usable: {source}")]
    UploadDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP Server
pub struct Server {
    router: Arc<Router>,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind a listener on `address`.
    ///
    /// Port 0 lets the OS pick a port; [`Server::local_addr`] reports it.
    pub async fn new(address: &str, router: Router) -> Result<Self, ServerError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| ServerError::BindError(format!("Invalid address {}: {}", address, e)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::BindError(format!("Failed to get local address: {}", e)))?;

        Ok(Self {
            router: Arc::new(router),
            listener,
            local_addr,
        })
    }

    /// The address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the process exits.
    ///
    /// Accept failures and connection errors are logged and do not stop the
    /// loop. An error while writing a response surfaces here as a connection
    /// error; by then the status line is already sent, so it is only logged.
    pub async fn run(self) -> Result<(), ServerError> {
        info!("Listening on {}", self.local_addr);

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let router = Arc::clone(&self.router);

            tokio::spawn(async move {
                let io = TokioIo::new(stream);

                let service = service_fn(move |req: Request<Incoming>| {
                    let router = Arc::clone(&router);
                    async move {
                        let span = info_span!(
                            "http.request",
                            http.method = %req.method(),
                            http.target = %req.uri().path(),
                            peer = %peer_addr,
                        );
                        let response = async {
                            debug!("Handling request");
                            let response = router.dispatch(req).await;
                            info!(status = response.status().as_u16(), "Request complete");
                            response
                        }
                        .instrument(span)
                        .await;
                        Ok::<_, Infallible>(response)
                    }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", peer_addr, e);
                }
            });
        }
    }
}
