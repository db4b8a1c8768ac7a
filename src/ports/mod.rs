// Ports - Interface definitions (contracts)

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for turning manifest bytes into ordered cut jobs
pub trait ManifestPort: Send + Sync {
    /// Parse the whole manifest or fail without producing any job
    fn parse(&self, manifest: &[u8]) -> Result<Vec<CutJob>, ManifestError>;
}

/// A single stream-copy invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CutRequest {
    pub source: PathBuf,
    pub timing: CutTiming,
    pub output: PathBuf,
}

/// How the external tool terminated
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolExit {
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Trimmed tail of the tool's stderr
    pub stderr: String,
}

/// Port for the external cutting tool
#[async_trait]
pub trait CutToolPort: Send + Sync {
    /// Run one cut to completion. Errors only when the tool could not be launched.
    async fn run_cut(&self, request: &CutRequest) -> io::Result<ToolExit>;

    /// Program name used in diagnostics
    fn tool_name(&self) -> String;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a file exists
    async fn file_exists(&self, path: &Path) -> bool;

    /// Remove a file; `NotFound` is returned when there is nothing to remove
    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Check that a regular file exists and can be opened for reading
    async fn check_readable_file(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and all missing ancestors
    async fn create_directory(&self, path: &Path) -> io::Result<()>;
}

/// Port for incremental progress reporting
pub trait ProgressPort: Send + Sync {
    /// Called once the manifest is parsed and jobs are about to run
    fn on_start(&self, total: usize);

    /// Called after every job with the updated progress
    fn on_progress(&self, progress: &RunProgress, result: &JobResult);

    /// Called once when the run reaches a terminal state
    fn on_finish(&self, report: &RunReport);

    /// Checked before each job starts
    fn should_cancel(&self) -> bool {
        false
    }
}
