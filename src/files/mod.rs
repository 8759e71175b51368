//! Static file serving
//!
//! Serves the public directory over `GET` and `HEAD`. Directories are
//! answered with their `index.html` when present and with a link listing
//! otherwise. Request paths never resolve outside the public directory.

pub mod mime;

use crate::response::{self, Body};
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, Response, StatusCode};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const INDEX_FILE: &str = "index.html";

/// Characters escaped in listing links
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// File server rooted at a public directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Answer a request for `raw_path`, the undecoded URI path
    pub async fn serve(&self, method: &Method, raw_path: &str) -> Response<Body> {
        if method != Method::GET && method != Method::HEAD {
            let mut res = response::text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            res.headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
            return res;
        }

        let Ok(decoded) = percent_decode_str(raw_path).decode_utf8() else {
            return response::not_found();
        };
        let Some(relative) = resolve_relative(&decoded) else {
            debug!(path = %raw_path, "Rejected path outside public directory");
            return response::not_found();
        };

        let path = self.root.join(relative);
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => return io_error_response(&path, &e),
        };

        if !metadata.is_dir() {
            return serve_file(&path).await;
        }

        if !raw_path.ends_with('/') {
            return response::redirect(&format!("{}/", raw_path));
        }

        let index = path.join(INDEX_FILE);
        match fs::metadata(&index).await {
            Ok(m) if m.is_file() => serve_file(&index).await,
            _ => list_directory(&path, &decoded).await,
        }
    }
}

/// Convert a decoded URL path to a path relative to the root.
///
/// Returns `None` for `..` segments or embedded NUL bytes.
fn resolve_relative(url_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\0') || s.contains('\\') => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

async fn serve_file(path: &Path) -> Response<Body> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::content_type(path.extension().and_then(|e| e.to_str()));
            response::with_content_type(StatusCode::OK, content_type, content)
        }
        Err(e) => io_error_response(path, &e),
    }
}

async fn list_directory(dir: &Path, url_path: &str) -> Response<Body> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => return io_error_response(dir, &e),
    };

    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let mut name = entry.file_name().to_string_lossy().into_owned();
                if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                    name.push('/');
                }
                names.push(name);
            }
            Ok(None) => break,
            Err(e) => return io_error_response(dir, &e),
        }
    }
    names.sort();

    response::with_content_type(
        StatusCode::OK,
        "text/html; charset=utf-8",
        render_listing(url_path, &names),
    )
}

fn render_listing(url_path: &str, names: &[String]) -> String {
    let mut html = String::from("<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n");
    html.push_str(&format!("<title>Index of {}</title>\n<pre>\n", escape_html(url_path)));
    for name in names {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            utf8_percent_encode(name, HREF_ESCAPE),
            escape_html(name)
        ));
    }
    html.push_str("</pre>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn io_error_response(path: &Path, err: &io::Error) -> Response<Body> {
    match err.kind() {
        io::ErrorKind::NotFound => response::not_found(),
        io::ErrorKind::PermissionDenied => response::text(StatusCode::FORBIDDEN, "Forbidden"),
        _ => {
            warn!(path = %path.display(), error = %err, "Failed to read static file");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
