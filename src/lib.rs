//! Disk Uploadr Library
//!
//! Minimal HTTP upload server: `POST /upload` with a `multipart/form-data`
//! body writes every part to the upload directory, and every other path is
//! served from a public directory.
//!
//! # Example
//!
//! ```no_run
//! use disk_uploadr::{config::Config, server::bootstrap};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     bootstrap::run(&config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod files;
pub mod metrics;
pub mod response;
pub mod router;
pub mod server;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use router::Router;
pub use server::Server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
