//! Upload sink: opens destination files inside the upload directory.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};

/// Creates files in a fixed upload directory
#[derive(Debug, Clone)]
pub struct UploadSink {
    dir: PathBuf,
}

impl UploadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a stored filename resolves to
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Open `{dir}/{filename}` for writing, creating or truncating it.
    ///
    /// The directory is not created here; a missing or read-only directory
    /// surfaces as the OS error.
    pub async fn create(&self, filename: &str) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path_for(filename))
            .await
    }
}
