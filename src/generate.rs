//! End-to-end document generation.
//!
//! ```text
//! validate ─► check output dir ─► connect ─► build snapshot ─► close source
//!                                                   │
//!                     ┌─────────────────────────────┴──────────────┐
//!                     ▼                                            ▼
//!          workbook: layout ─► xlsx ─► write          other: document engine
//! ```
//!
//! The pipeline is strictly sequential and stops at the first error.
//!
//! # Example
//!
//! ```ignore
//! use dbdoc::config::ConnectionParams;
//! use dbdoc::generate::{generate, GenerateRequest, OutputOptions};
//!
//! let request = GenerateRequest::new(
//!     ConnectionParams::new("postgres://db/erp").with_credentials("ro", "pw"),
//! )
//! .with_output(OutputOptions::default().with_dir("docs").with_title("erp"));
//!
//! let path = generate(&request, None).await?;
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::config::{ConnectionError, ConnectionParams, OutputSettings, PoolSettings, SettingsError};
use crate::engine::{DocumentEngine, EngineConfig, EngineError};
use crate::filter::FilterSpec;
use crate::metadata::{self, MetadataError, MetadataSource, TableEntry};
use crate::model::{SchemaModelBuilder, SchemaSnapshot};
use crate::output::{FileType, OutputError, OutputWriter, UnknownFileType};
use crate::workbook::{self, RenderError};

/// File name used when no title is given.
pub const DEFAULT_TITLE: &str = "database-document";

// ============================================================================
// Error Types
// ============================================================================

/// Invalid or missing input, detected before any document is produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    FileType(#[from] UnknownFileType),

    #[error("output path '{}' exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Metadata,
    Render,
    Io,
    Engine,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::Metadata => "MetadataError",
            ErrorKind::Render => "RenderError",
            ErrorKind::Io => "IOError",
            ErrorKind::Engine => "EngineError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::Config(_) => ErrorKind::Config,
            GenerateError::Metadata(_) => ErrorKind::Metadata,
            GenerateError::Render(_) => ErrorKind::Render,
            GenerateError::Io { .. } => ErrorKind::Io,
            GenerateError::Engine(_) => ErrorKind::Engine,
        }
    }
}

impl From<OutputError> for GenerateError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::NotADirectory { path } => ConfigError::NotADirectory { path }.into(),
            OutputError::Io { path, source } => GenerateError::Io { path, source },
        }
    }
}

impl From<ConnectionError> for GenerateError {
    fn from(err: ConnectionError) -> Self {
        ConfigError::from(err).into()
    }
}

impl From<UnknownFileType> for GenerateError {
    fn from(err: UnknownFileType) -> Self {
        ConfigError::from(err).into()
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;

// ============================================================================
// Request
// ============================================================================

/// Where and how the document is written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    /// File name without extension. Empty selects [`DEFAULT_TITLE`].
    pub title: String,
    pub file_type: FileType,
    /// Passed to the document engine only.
    pub version: String,
    /// Passed to the document engine only.
    pub description: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            title: DEFAULT_TITLE.to_string(),
            file_type: FileType::Workbook,
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }
}

impl OutputOptions {
    pub fn from_settings(settings: &OutputSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            dir: settings.dir.clone(),
            title: settings.title.clone(),
            file_type: settings.file_type.parse()?,
            version: settings.version.clone(),
            description: settings.description.clone(),
        })
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub connection: ConnectionParams,
    pub filter: FilterSpec,
    pub output: OutputOptions,
    pub pool: PoolSettings,
}

impl GenerateRequest {
    pub fn new(connection: ConnectionParams) -> Self {
        Self {
            connection,
            filter: FilterSpec::default(),
            output: OutputOptions::default(),
            pool: PoolSettings::default(),
        }
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_pool(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Connect, document the schema and write the result.
///
/// Returns the path of the produced file. The connection pool is closed
/// whether or not the snapshot could be built.
pub async fn generate(
    request: &GenerateRequest,
    engine: Option<&dyn DocumentEngine>,
) -> GenerateResult<PathBuf> {
    let driver = request.connection.validate()?;
    check_engine(request.output.file_type, engine)?;

    let writer = OutputWriter::new(&request.output.dir);
    writer.check_dir().await?;

    let source = metadata::connect(driver, &request.connection, &request.pool).await?;
    let snapshot = build_snapshot(source.as_ref(), request).await;
    source.close().await;

    deliver(&snapshot?, &request.output, engine, &writer).await
}

/// Same as [`generate`], over a source the caller owns. The source is left
/// open.
pub async fn generate_with_source(
    source: &dyn MetadataSource,
    request: &GenerateRequest,
    engine: Option<&dyn DocumentEngine>,
) -> GenerateResult<PathBuf> {
    check_engine(request.output.file_type, engine)?;

    let writer = OutputWriter::new(&request.output.dir);
    writer.check_dir().await?;

    let snapshot = build_snapshot(source, request).await?;
    deliver(&snapshot, &request.output, engine, &writer).await
}

/// Tables that would be documented, without rendering anything.
pub async fn preview_tables(request: &GenerateRequest) -> GenerateResult<Vec<TableEntry>> {
    let driver = request.connection.validate()?;

    let source = metadata::connect(driver, &request.connection, &request.pool).await?;
    let tables = preview_tables_with_source(source.as_ref(), request).await;
    source.close().await;

    tables
}

pub async fn preview_tables_with_source(
    source: &dyn MetadataSource,
    request: &GenerateRequest,
) -> GenerateResult<Vec<TableEntry>> {
    let tables = SchemaModelBuilder::new(source)
        .with_filter(&request.filter)
        .with_schema(request.connection.schema.clone())
        .admitted_tables()
        .await?;
    Ok(tables)
}

fn check_engine(file_type: FileType, engine: Option<&dyn DocumentEngine>) -> GenerateResult<()> {
    if !file_type.is_workbook() && engine.is_none() {
        return Err(EngineError::NotConfigured(file_type).into());
    }
    Ok(())
}

async fn build_snapshot(
    source: &dyn MetadataSource,
    request: &GenerateRequest,
) -> GenerateResult<SchemaSnapshot> {
    let snapshot = SchemaModelBuilder::new(source)
        .with_filter(&request.filter)
        .with_schema(request.connection.schema.clone())
        .build()
        .await?;
    Ok(snapshot)
}

async fn deliver(
    snapshot: &SchemaSnapshot,
    output: &OutputOptions,
    engine: Option<&dyn DocumentEngine>,
    writer: &OutputWriter,
) -> GenerateResult<PathBuf> {
    let title = output.title();

    let path = match (output.file_type, engine) {
        (FileType::Workbook, _) => {
            let bytes = workbook::render(snapshot)?;
            writer.write_workbook(title, &bytes).await?
        }
        (file_type, Some(engine)) => {
            writer.ensure_dir().await?;
            let config = EngineConfig {
                output_dir: writer.dir().to_path_buf(),
                file_name: title.to_string(),
                file_type,
                version: output.version.clone(),
                description: output.description.clone(),
            };
            engine.render(snapshot, &config).await?
        }
        (file_type, None) => return Err(EngineError::NotConfigured(file_type).into()),
    };

    info!(
        path = %path.display(),
        tables = snapshot.tables.len(),
        "documentation generated"
    );
    Ok(path)
}
