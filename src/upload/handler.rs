//! Multipart upload handler
//!
//! Decodes the request body part by part and stores each part through the
//! [`UploadSink`]. Parts are handled strictly one after another: a part is
//! written in full and its file closed before the next part is read.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use disk_uploadr::upload::UploadHandler;
//! use http_body_util::Full;
//! use hyper::Request;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = UploadHandler::new("./uploaded");
//! let body = "--b\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\r\nhi\r\n--b--\r\n";
//! let request = Request::post("/upload")
//!     .header("Content-Type", "multipart/form-data; boundary=b")
//!     .body(Full::new(Bytes::from(body)))?;
//! let response = handler.handle(request).await?;
//! assert_eq!(response.summary.files, 1);
//! # Ok(())
//! # }
//! ```

use super::{
    filename, HttpError, UploadError, UploadResponse, UploadSink, UploadSummary, CHUNK_SIZE,
};
use crate::metrics;
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use multer::{Field, Multipart};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Stores every part of a multipart POST in the upload directory
#[derive(Debug, Clone)]
pub struct UploadHandler {
    sink: UploadSink,
}

impl UploadHandler {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink: UploadSink::new(upload_dir),
        }
    }

    pub fn sink(&self) -> &UploadSink {
        &self.sink
    }

    /// Handle one request
    ///
    /// # Returns
    ///
    /// * `Ok(UploadResponse)` - every part was stored (possibly zero parts)
    /// * `Err(UploadError::Http)` - the method is not POST (404)
    /// * `Err(UploadError::Multipart)` - the content type or framing is invalid
    /// * `Err(UploadError::Io)` - a destination file could not be created or
    ///   written; files stored for earlier parts are left in place
    pub async fn handle<B>(&self, req: Request<B>) -> Result<UploadResponse, UploadError>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        if req.method() != Method::POST {
            return Err(HttpError::not_found().into());
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let boundary = multipart_boundary(content_type)?;

        let mut multipart = Multipart::new(req.into_body().into_data_stream(), boundary);
        let mut summary = UploadSummary::default();

        while let Some(field) = multipart.next_field().await? {
            summary.bytes += self.store_part(field).await?;
            summary.files += 1;
        }

        info!(
            files = summary.files,
            bytes = summary.bytes,
            "Upload complete"
        );

        Ok(UploadResponse::uploaded(summary))
    }

    /// Copy one part into its own file. The file is closed when this returns.
    async fn store_part(&self, mut field: Field<'_>) -> Result<u64, UploadError> {
        let name = filename::generate(field.file_name().unwrap_or_default());
        let mut file = self.sink.create(&name).await?;
        let mut written = 0u64;

        while let Some(chunk) = field.chunk().await? {
            for piece in chunk.chunks(CHUNK_SIZE) {
                file.write_all(piece).await?;
            }
            written += chunk.len() as u64;
        }
        file.flush().await?;

        metrics::record_stored_file(written);
        debug!(file = %name, bytes = written, "Stored part");
        Ok(written)
    }
}

/// Boundary of any `multipart/*` content type (`form-data`, `mixed`, ...)
fn multipart_boundary(content_type: &str) -> Result<String, multer::Error> {
    let parsed: mime::Mime = content_type
        .parse()
        .map_err(|_| multer::Error::NoMultipart)?;

    if parsed.type_() != mime::MULTIPART {
        return Err(multer::Error::NoMultipart);
    }

    parsed
        .get_param(mime::BOUNDARY)
        .map(|boundary| boundary.as_str().to_string())
        .ok_or(multer::Error::NoBoundary)
}
