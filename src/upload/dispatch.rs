//! Maps handler outcomes to HTTP responses.
//!
//! | Outcome        | Response                                 |
//! |----------------|------------------------------------------|
//! | success        | handler's status and message             |
//! | typed error    | that error's status and message          |
//! | any other error| logged, 500 "Internal server error"      |

use super::{UploadError, UploadResponse, INTERNAL_ERROR_MESSAGE};
use crate::metrics;
use crate::response::{self, Body};
use hyper::{Response, StatusCode};
use tracing::{error, warn};

/// Convert the result of [`UploadHandler::handle`](super::UploadHandler::handle)
/// into the response written to the client
pub fn into_response(result: Result<UploadResponse, UploadError>) -> Response<Body> {
    match result {
        Ok(res) => response::text(res.status, res.message),
        Err(UploadError::Http(e)) => {
            warn!(status = e.status.as_u16(), "{}", e);
            metrics::record_error("http");
            response::text(e.status, e.message)
        }
        Err(e) => {
            error!(error = %e, "Upload failed");
            metrics::record_error(e.kind());
            response::text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}
