// Cut executor - Runs one cut through the tool port and classifies the result

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::model::*;
use crate::ports::*;

/// Classified outcome of one tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CutOutcome {
    pub outcome: JobOutcome,
    pub diagnostic: String,
}

/// Invokes the external cutter and verifies its output
pub struct CutExecutor {
    tool: Arc<dyn CutToolPort>,
    fs: Arc<dyn FsPort>,
}

impl CutExecutor {
    /// Create new cut executor with injected ports
    pub fn new(tool: Arc<dyn CutToolPort>, fs: Arc<dyn FsPort>) -> Self {
        Self { tool, fs }
    }

    /// Run the cut to completion. Never fails: every problem becomes an outcome.
    pub async fn execute(&self, source: &Path, timing: CutTiming, output: &Path) -> CutOutcome {
        let request = CutRequest {
            source: source.to_path_buf(),
            timing,
            output: output.to_path_buf(),
        };
        let tool = self.tool.tool_name();

        let exit = match self.tool.run_cut(&request).await {
            Ok(exit) => exit,
            Err(e) => {
                return CutOutcome {
                    outcome: JobOutcome::ToolReportedFailure,
                    diagnostic: format!("failed to launch {}: {}", tool, e),
                }
            }
        };
        debug!(code = ?exit.code, success = exit.success, "Cut tool finished");

        if !exit.success {
            let status = match exit.code {
                Some(code) => format!("exit code {}", code),
                None => "termination by signal".to_string(),
            };
            return CutOutcome {
                outcome: JobOutcome::ToolReportedFailure,
                diagnostic: with_tool_output(format!("{} failed with {}", tool, status), &exit.stderr),
            };
        }

        if !self.fs.file_exists(output).await {
            return CutOutcome {
                outcome: JobOutcome::OutputFileMissing,
                diagnostic: with_tool_output(
                    format!("{} exited cleanly but {} was not created", tool, output.display()),
                    &exit.stderr,
                ),
            };
        }

        CutOutcome {
            outcome: JobOutcome::Success,
            diagnostic: exit.stderr,
        }
    }
}

fn with_tool_output(message: String, stderr: &str) -> String {
    if stderr.is_empty() {
        message
    } else {
        format!("{}: {}", message, stderr)
    }
}
