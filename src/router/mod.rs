//! Request router
//!
//! Built once at startup and shared by every connection. `/upload` goes to
//! the upload handler; every other path is served from the public directory.

use crate::config::StorageConfig;
use crate::files::StaticFiles;
use crate::metrics;
use crate::response::Body;
use crate::upload::{dispatch, UploadHandler};
use bytes::Bytes;
use hyper::{Request, Response};

/// Path the upload handler is mounted at
pub const UPLOAD_PATH: &str = "/upload";

/// Route a request path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upload,
    Static,
}

impl Route {
    /// Resolve a request path. Only the exact upload path matches the upload
    /// route; `/upload/` and `/uploads` are static paths.
    pub fn resolve(path: &str) -> Self {
        if path == UPLOAD_PATH {
            Route::Upload
        } else {
            Route::Static
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Upload => "upload",
            Route::Static => "static",
        }
    }
}

/// Dispatches requests to the upload handler or the file server
#[derive(Debug, Clone)]
pub struct Router {
    upload: UploadHandler,
    files: StaticFiles,
}

impl Router {
    pub fn new(upload: UploadHandler, files: StaticFiles) -> Self {
        Self { upload, files }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(
            UploadHandler::new(&storage.upload_dir),
            StaticFiles::new(&storage.public_dir),
        )
    }

    pub fn upload(&self) -> &UploadHandler {
        &self.upload
    }

    pub fn files(&self) -> &StaticFiles {
        &self.files
    }

    /// Produce the response for a request
    pub async fn dispatch<B>(&self, req: Request<B>) -> Response<Body>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        let route = Route::resolve(req.uri().path());
        let response = match route {
            Route::Upload => dispatch::into_response(self.upload.handle(req).await),
            Route::Static => {
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                self.files.serve(&method, &path).await
            }
        };
        metrics::record_request(route.as_str(), response.status().as_u16());
        response
    }
}
