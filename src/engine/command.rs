//! Engine that runs an external command.
//!
//! The command receives the engine configuration as arguments and the
//! snapshot as a single JSON document on stdin:
//!
//! ```text
//! <command> [args...] --output-dir <dir> --file-name <name> --file-type <type>
//!                     --version <version> --description <text>
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::{DocumentEngine, EngineConfig, EngineError, EngineResult};
use crate::model::SchemaSnapshot;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandEngine {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Arguments placed before the engine configuration.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn config_args(config: &EngineConfig) -> Vec<String> {
        vec![
            "--output-dir".to_string(),
            config.output_dir.display().to_string(),
            "--file-name".to_string(),
            config.file_name.clone(),
            "--file-type".to_string(),
            config.file_type.as_str().to_string(),
            "--version".to_string(),
            config.version.clone(),
            "--description".to_string(),
            config.description.clone(),
        ]
    }
}

#[async_trait]
impl DocumentEngine for CommandEngine {
    async fn render(&self, snapshot: &SchemaSnapshot, config: &EngineConfig) -> EngineResult<PathBuf> {
        let payload = serde_json::to_vec(snapshot).map_err(EngineError::SerializeFailed)?;

        info!(
            program = %self.program.display(),
            file_type = %config.file_type,
            tables = snapshot.tables.len(),
            "delegating to document engine"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(Self::config_args(config))
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(EngineError::SpawnFailed)?;

        // Feed stdin while the child runs, so a child that never reads its
        // input still falls under the timeout. wait_with_output drains stderr
        // concurrently.
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok::<(), io::Error>(());
            };
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::time::timeout(self.timeout, async {
            tokio::join!(feed, child.wait_with_output())
        })
        .await
        .map_err(|_| EngineError::Timeout(self.timeout.as_secs()))?;
        let output = output.map_err(EngineError::SpawnFailed)?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A child may finish without consuming all of its input.
        if let Err(e) = fed {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(EngineError::WriteFailed(e));
            }
        }

        let target = config.target();
        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(EngineError::MissingOutput(target));
        }

        debug!(path = %target.display(), "document engine finished");
        Ok(target)
    }
}
