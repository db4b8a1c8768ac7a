// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One manifest row describing a single output clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutJob {
    /// 0-based position in the manifest
    pub index: usize,
    pub start_frame: f64,
    pub end_frame: f64,
    pub filename_stem: String,
}

impl CutJob {
    /// Create a new cut job
    pub fn new(index: usize, start_frame: f64, end_frame: f64, filename_stem: impl Into<String>) -> Self {
        Self {
            index,
            start_frame,
            end_frame,
            filename_stem: filename_stem.into(),
        }
    }
}

impl fmt::Display for CutJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} '{}' frames {}-{}",
            self.index + 1,
            self.filename_stem,
            self.start_frame,
            self.end_frame
        )
    }
}

/// Per-run settings supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub source_video_path: PathBuf,
    pub output_directory: PathBuf,
    pub frame_rate: f64,
    pub filename_prefix: String,
}

impl RunConfig {
    /// Create a run configuration with an empty filename prefix
    pub fn new(
        source_video_path: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        frame_rate: f64,
    ) -> Self {
        Self {
            source_video_path: source_video_path.into(),
            output_directory: output_directory.into(),
            frame_rate,
            filename_prefix: String::new(),
        }
    }

    /// Set the filename prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }
}

/// Start time and duration of a cut, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutTiming {
    pub start_time: f64,
    pub duration: f64,
}

/// How a single job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// Tool exited cleanly and the output file exists
    Success,
    /// Non-zero exit, signal, or the tool could not be launched
    ToolReportedFailure,
    /// Tool exited cleanly but left no output file
    OutputFileMissing,
    /// The manifest row itself is unusable
    ValidationError,
    /// Output directories could not be created or a stale output could not be cleared
    OutputPathFailed,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success)
    }

    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Success => "ok",
            JobOutcome::ToolReportedFailure => "tool failed",
            JobOutcome::OutputFileMissing => "output missing",
            JobOutcome::ValidationError => "invalid row",
            JobOutcome::OutputPathFailed => "output path error",
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of attempting one cut job
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub job: CutJob,
    pub timing: Option<CutTiming>,
    pub output_path: Option<PathBuf>,
    pub outcome: JobOutcome,
    pub diagnostic: String,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl JobResult {
    /// Result for a row rejected before any timing was computed
    pub fn invalid(job: CutJob, diagnostic: impl Into<String>) -> Self {
        Self {
            job,
            timing: None,
            output_path: None,
            outcome: JobOutcome::ValidationError,
            diagnostic: diagnostic.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// One human-readable log line for this result
    pub fn log_line(&self) -> String {
        let target = self
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!("[{}] {} -> {}", self.outcome, self.job, target);
        if let Some(timing) = &self.timing {
            line.push_str(&format!(
                " (start {:.3}s, duration {:.3}s)",
                timing.start_time, timing.duration
            ));
        }
        if !self.diagnostic.is_empty() {
            line.push_str(": ");
            line.push_str(&self.diagnostic);
        }
        line
    }
}

/// Batch runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Validating,
    Running { index: usize, total: usize },
    Completed,
    Aborted,
    Cancelled,
}

impl RunState {
    /// Whether the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted | RunState::Cancelled)
    }
}

/// Progress snapshot emitted after each job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
    pub description: String,
}

impl RunProgress {
    /// Fraction complete in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Accumulated outcome of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub results: Vec<JobResult>,
    pub jobs_completed: usize,
    pub jobs_total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    /// Create an empty report for `jobs_total` jobs
    pub fn new(jobs_total: usize) -> Self {
        Self {
            state: RunState::NotStarted,
            results: Vec::with_capacity(jobs_total),
            jobs_completed: 0,
            jobs_total,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append a finished job
    pub fn record(&mut self, result: JobResult) {
        self.results.push(result);
        self.jobs_completed = self.results.len();
    }

    /// Mark the report terminal
    pub fn finish(&mut self, state: RunState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Count of results with the given outcome
    pub fn count(&self, outcome: JobOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Progress snapshot as of the last recorded job
    pub fn progress(&self) -> RunProgress {
        let description = self
            .results
            .last()
            .map(JobResult::log_line)
            .unwrap_or_default();
        RunProgress {
            completed: self.jobs_completed,
            total: self.jobs_total,
            description,
        }
    }

    /// Scrollable log, one line per job, followed by a summary line
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.results.iter().map(JobResult::log_line).collect();
        lines.push(self.summary());
        lines
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} of {} jobs attempted: {} succeeded, {} failed",
            self.jobs_completed,
            self.jobs_total,
            self.succeeded(),
            self.failed()
        );
        if self.state == RunState::Cancelled {
            summary.push_str(" (cancelled)");
        }
        summary
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests;
