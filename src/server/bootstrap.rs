//! Startup: prepare the upload directory, build the router, bind and serve.

use super::{Server, ServerError};
use crate::config::Config;
use crate::router::Router;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Make sure the upload directory exists.
///
/// An existing path is accepted as is. A missing directory is created (one
/// level, mode 0755 on unix). Any other error, such as a permission problem
/// on the parent, is returned.
pub async fn ensure_upload_dir(dir: &Path) -> Result<(), ServerError> {
    let err = match fs::metadata(dir).await {
        Ok(_) => return Ok(()),
        Err(e) => e,
    };

    let upload_dir_error = |source| ServerError::UploadDirError {
        path: dir.to_path_buf(),
        source,
    };

    if err.kind() != io::ErrorKind::NotFound {
        return Err(upload_dir_error(err));
    }

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(dir).await.map_err(upload_dir_error)?;

    info!(path = %dir.display(), "Created upload directory");
    Ok(())
}

/// Bind the server described by `config`.
///
/// The upload directory is checked before binding, so a bad directory fails
/// startup without ever opening the port.
pub async fn bind(config: &Config) -> Result<Server, ServerError> {
    ensure_upload_dir(&config.storage.upload_dir).await?;

    let router = Router::from_config(&config.storage);
    info!(
        upload_dir = %config.storage.upload_dir.display(),
        public_dir = %config.storage.public_dir.display(),
        "Routes: / -> public files, /upload -> upload handler"
    );

    Server::new(&config.server.address, router).await
}

/// Bind and serve forever
pub async fn run(config: &Config) -> Result<(), ServerError> {
    bind(config).await?.run().await
}
