//! FFmpeg execution adapter
//!
//! Runs the external cutting tool as a child process. Arguments are always
//! passed as a vector so paths containing spaces or shell metacharacters reach
//! the tool unchanged.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::rules::TimeCalculator;
use crate::ports::*;

/// Default program name, resolved through `PATH`
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// Stderr is cut down to this many trailing characters for diagnostics
const STDERR_TAIL_CHARS: usize = 2000;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    program: PathBuf,
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument vector for a stream-copy cut
    pub fn build_args(request: &CutRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(request.source.clone().into_os_string());
        args.push("-ss".into());
        args.push(TimeCalculator::format_seconds(request.timing.start_time).into());
        args.push("-t".into());
        args.push(TimeCalculator::format_seconds(request.timing.duration).into());
        args.push("-c".into());
        args.push("copy".into());
        args.push(request.output.clone().into_os_string());
        args
    }
}

/// Keep the last `max_chars` characters of trimmed tool output
fn stderr_tail(raw: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        text.chars().skip(count - max_chars).collect()
    }
}

#[async_trait]
impl CutToolPort for FFmpegAdapter {
    async fn run_cut(&self, request: &CutRequest) -> io::Result<ToolExit> {
        let args = Self::build_args(request);
        debug!(program = %self.program.display(), ?args, "Launching cut tool");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ToolExit {
            success: output.status.success(),
            code: output.status.code(),
            stderr: stderr_tail(&output.stderr, STDERR_TAIL_CHARS),
        })
    }

    fn tool_name(&self) -> String {
        self.program.display().to_string()
    }
}
