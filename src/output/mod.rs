//! Output writer.
//!
//! Places finished documents at `<dir>/<title>.<ext>`, creating the
//! directory (and parents) on demand. A failed write may leave a partial file
//! behind.

mod file_type;

pub use file_type::{FileType, UnknownFileType};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output path '{}' exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OutputError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fails when the directory path is taken by something else. A missing
    /// directory is fine; it is created on write.
    pub async fn check_dir(&self) -> OutputResult<()> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if !meta.is_dir() => Err(OutputError::NotADirectory {
                path: self.dir.clone(),
            }),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OutputError::io(&self.dir)(e)),
        }
    }

    /// Create the directory and its parents if missing.
    pub async fn ensure_dir(&self) -> OutputResult<()> {
        self.check_dir().await?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(OutputError::io(&self.dir))
    }

    pub fn target(&self, title: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{title}.{extension}"))
    }

    /// Write a workbook and return where it landed.
    pub async fn write_workbook(&self, title: &str, bytes: &[u8]) -> OutputResult<PathBuf> {
        self.write(title, FileType::Workbook.extension(), bytes).await
    }

    pub async fn write(&self, title: &str, extension: &str, bytes: &[u8]) -> OutputResult<PathBuf> {
        self.ensure_dir().await?;

        let path = self.target(title, extension);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(OutputError::io(&path))?;

        info!(path = %path.display(), bytes = bytes.len(), "document written");
        Ok(path)
    }
}
