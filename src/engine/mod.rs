//! Document engine interface.
//!
//! Formats other than the workbook (HTML, Word, Markdown) are produced by an
//! external templating engine fed with the same [`SchemaSnapshot`]. This
//! module only defines that seam and a process-backed implementation; the
//! templates themselves live outside this crate.

mod command;

pub use command::CommandEngine;

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::model::SchemaSnapshot;
use crate::output::FileType;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No engine command is configured for a non-workbook format.
    #[error("no document engine configured for '{0}' output")]
    NotConfigured(FileType),

    #[error("failed to spawn document engine: {0}")]
    SpawnFailed(#[source] io::Error),

    #[error("failed to send snapshot to document engine: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("failed to serialize snapshot: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("document engine timed out after {0} seconds")]
    Timeout(u64),

    #[error("document engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("document engine reported success but '{}' was not produced", .0.display())]
    MissingOutput(PathBuf),
}

/// What the engine should produce, and where.
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    pub output_dir: PathBuf,
    pub file_name: String,
    pub file_type: FileType,
    pub version: String,
    pub description: String,
}

impl EngineConfig {
    /// Path the engine is expected to write.
    pub fn target(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.file_name, self.file_type.extension()))
    }
}

/// Renders a snapshot into a non-workbook document.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    /// Render and return the path of the produced file.
    async fn render(&self, snapshot: &SchemaSnapshot, config: &EngineConfig) -> EngineResult<PathBuf>;
}
