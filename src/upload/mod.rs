//! Upload module
//!
//! Accepts multipart requests and writes every part to the
//! upload directory as `{unix_seconds}-{filename}`.

use hyper::StatusCode;
use thiserror::Error;

pub mod dispatch;
pub mod filename;
pub mod handler;
pub mod sink;

pub use handler::UploadHandler;
pub use sink::UploadSink;

/// Size of the slices a part's bytes are written in
pub const CHUNK_SIZE: usize = 4096;

/// Body sent for every generic failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// An error that carries its own status and client-facing message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {}: {message}", .status.as_u16())]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Returned for every non-POST request so the endpoint stays hidden
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }
}

/// Upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] multer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Status code sent to the client
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::Http(e) => e.status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client. Generic failures never leak their cause.
    pub fn client_message(&self) -> &str {
        match self {
            UploadError::Http(e) => &e.message,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Label used for the error metric
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Http(_) => "http",
            UploadError::Multipart(_) => "multipart",
            UploadError::Io(_) => "io",
        }
    }
}

/// Successful handler outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: StatusCode,
    pub message: String,
    pub summary: UploadSummary,
}

impl UploadResponse {
    pub fn uploaded(summary: UploadSummary) -> Self {
        Self {
            status: StatusCode::OK,
            message: "File uploaded".to_string(),
            summary,
        }
    }
}

/// What a request stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub files: usize,
    pub bytes: u64,
}
