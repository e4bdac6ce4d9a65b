//! Files that live only as long as the request that created them.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::AppResult;

/// An uploaded video stored in a uniquely named `.mp4` temp file.
///
/// The file is removed when the value is dropped, on success and error
/// paths alike.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    /// Create an empty temp file inside `dir`.
    pub fn create_in(dir: &Path) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".mp4")
            .tempfile_in(dir)?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Stream a multipart field into the file, returning the bytes written.
    pub async fn write_field(&mut self, mut field: Field<'_>) -> AppResult<u64> {
        let mut out = tokio::fs::File::from_std(self.file.reopen()?);
        let mut written = 0u64;

        while let Some(chunk) = field.chunk().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        Ok(written)
    }
}

/// A reconstructed model downloaded on behalf of one request.
///
/// When `delete` is set the file is removed on drop. The guard is moved
/// into the response body stream, so removal happens once the body has been
/// sent or the client has gone away.
pub struct ResultFile {
    path: PathBuf,
    delete: bool,
}

impl ResultFile {
    pub fn new(path: PathBuf, delete: bool) -> Self {
        Self { path, delete }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ResultFile {
    fn drop(&mut self) {
        if !self.delete {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed result file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove result file")
            }
        }
    }
}
