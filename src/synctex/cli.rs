//! `synctex` command-line oracle.
//!
//! Runs one child process per lookup with a bounded timeout; the child is
//! killed if the timeout expires. Failed lookups are never retried.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::response::{self, SourceLocation, RESULT_BEGIN};
use super::{DocumentHit, SourceQuery, SyncOracle, SyncOutcome};
use crate::error::{Result, SyncError};
use crate::mapper::DocumentPoint;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn attempts while the binary is busy (`ETXTBSY`), e.g. just rewritten.
const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(50);

/// SyncTeX oracle backed by the `synctex` binary.
#[derive(Debug, Clone)]
pub struct SynctexCli {
    /// Path to synctex binary
    synctex_path: String,
    timeout: Duration,
}

impl SynctexCli {
    /// Create a new oracle, searching for the binary in PATH
    #[must_use]
    pub fn new() -> Self {
        let synctex_path = which::which("synctex")
            .map_or_else(|_| "synctex".to_string(), |p| p.to_string_lossy().to_string());

        Self {
            synctex_path,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Specify custom synctex binary path
    #[must_use]
    pub fn with_synctex_path(mut self, path: &str) -> Self {
        self.synctex_path = path.to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn synctex_path(&self) -> &str {
        &self.synctex_path
    }

    /// `synctex edit -o page:x:y:document`
    fn edit_args(document: &Path, point: DocumentPoint) -> Vec<String> {
        vec![
            "edit".to_string(),
            "-o".to_string(),
            format!(
                "{}:{}:{}:{}",
                point.page,
                point.x,
                point.y,
                document.display()
            ),
        ]
    }

    /// `synctex view -i line:column:input -o document`
    fn view_args(document: &Path, query: &SourceQuery) -> Vec<String> {
        vec![
            "view".to_string(),
            "-i".to_string(),
            format!("{}:{}:{}", query.line, query.column, query.input.display()),
            "-o".to_string(),
            document.display().to_string(),
        ]
    }

    async fn spawn(&self, args: &[String]) -> std::io::Result<Child> {
        let mut attempt = 1;
        loop {
            let spawned = Command::new(&self.synctex_path)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn();

            match spawned {
                Err(e) if e.kind() == ErrorKind::ExecutableFileBusy && attempt < SPAWN_ATTEMPTS => {
                    debug!("{} is busy, retrying spawn ({attempt}/{SPAWN_ATTEMPTS})", self.synctex_path);
                    attempt += 1;
                    tokio::time::sleep(SPAWN_RETRY_DELAY).await;
                }
                other => return other,
            }
        }
    }

    /// Run synctex and return its stdout.
    async fn run(&self, args: &[String]) -> Result<String> {
        let command = format!("{} {}", self.synctex_path, args.join(" "));
        debug!("synctex args: {:?}", args);

        let child = self
            .spawn(args)
            .await
            .map_err(|e| SyncError::OracleProcess {
                command: command.clone(),
                status: None,
                diagnostic: format!("failed to start {}: {e}", self.synctex_path),
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| SyncError::OracleProcess {
                command: command.clone(),
                status: None,
                diagnostic: format!("failed to wait for synctex: {e}"),
            })?,
            Err(_) => {
                warn!("synctex timed out after {:?}", self.timeout);
                return Err(SyncError::OracleProcess {
                    command,
                    status: None,
                    diagnostic: format!("timed out after {:?}", self.timeout),
                });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8(output.stdout).map_err(|e| SyncError::OracleProcess {
            command: command.clone(),
            status: output.status.code(),
            diagnostic: format!("output is not valid UTF-8: {e}"),
        })?;

        if !stderr.is_empty() {
            debug!("synctex stderr: {}", stderr);
        }

        // Exit codes are not a stable signal; a result block is parsed either way.
        if !output.status.success() && !stdout.contains(RESULT_BEGIN) {
            let diagnostic = if stderr.is_empty() {
                stdout.trim().to_string()
            } else {
                stderr
            };
            return Err(SyncError::OracleProcess {
                command,
                status: output.status.code(),
                diagnostic,
            });
        }

        Ok(stdout)
    }
}

impl Default for SynctexCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncOracle for SynctexCli {
    async fn edit(
        &self,
        document: &Path,
        point: DocumentPoint,
    ) -> Result<SyncOutcome<SourceLocation>> {
        let stdout = self.run(&Self::edit_args(document, point)).await?;
        Ok(match response::parse_edit(&stdout) {
            Some(location) => SyncOutcome::Found(location),
            None => SyncOutcome::NotFound { raw: stdout },
        })
    }

    async fn view(
        &self,
        document: &Path,
        query: &SourceQuery,
    ) -> Result<SyncOutcome<Vec<DocumentHit>>> {
        let stdout = self.run(&Self::view_args(document, query)).await?;
        let hits = response::parse_view(&stdout);
        Ok(if hits.is_empty() {
            SyncOutcome::NotFound { raw: stdout }
        } else {
            SyncOutcome::Found(hits)
        })
    }
}
