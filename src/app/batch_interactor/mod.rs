// Batch interactor - Runs every cut in a manifest against one source video

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::cut_executor::CutExecutor;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// A job as it would run, computed without invoking the tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCut {
    pub job: CutJob,
    pub timing: Option<CutTiming>,
    pub output_path: Option<PathBuf>,
    /// Why the row would be rejected, if it would
    pub problem: Option<String>,
}

/// Interactor for the batch cutting use case
pub struct BatchInteractor {
    manifest_port: Arc<dyn ManifestPort>,
    fs_port: Arc<dyn FsPort>,
    progress_port: Arc<dyn ProgressPort>,
    executor: CutExecutor,
    resolver: OutputPathResolver,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
    pub fn new(
        manifest_port: Arc<dyn ManifestPort>,
        tool_port: Arc<dyn CutToolPort>,
        fs_port: Arc<dyn FsPort>,
        progress_port: Arc<dyn ProgressPort>,
        resolver: OutputPathResolver,
    ) -> Self {
        let executor = CutExecutor::new(tool_port, Arc::clone(&fs_port));
        Self {
            manifest_port,
            fs_port,
            progress_port,
            executor,
            resolver,
        }
    }

    /// Execute every job in the manifest, in order.
    ///
    /// Returns `Err` only when nothing was attempted. Once jobs start, the
    /// report holds one result per job regardless of individual failures.
    pub async fn run(&self, manifest: &[u8], config: &RunConfig) -> Result<RunReport, RunError> {
        let mut report = RunReport::new(0);
        Self::transition(&mut report, RunState::Validating);

        let (output_dir, jobs) = match self.validate(manifest, config).await {
            Ok(validated) => validated,
            Err(e) => {
                Self::transition(&mut report, RunState::Aborted);
                error!("Run aborted before any job: {}", e);
                return Err(e);
            }
        };

        let total = jobs.len();
        report.jobs_total = total;
        info!(
            source = %config.source_video_path.display(),
            output = %output_dir.display(),
            frame_rate = config.frame_rate,
            "Running {} cut jobs",
            total
        );
        self.progress_port.on_start(total);

        for job in jobs {
            if self.progress_port.should_cancel() {
                warn!("Cancellation requested, {} jobs not started", total - report.jobs_completed);
                Self::transition(&mut report, RunState::Cancelled);
                self.progress_port.on_finish(&report);
                return Ok(report);
            }

            Self::transition(
                &mut report,
                RunState::Running {
                    index: job.index,
                    total,
                },
            );
            let result = self.run_job(job, &output_dir, config).await;
            report.record(result);

            let progress = report.progress();
            if let Some(last) = report.results.last() {
                self.progress_port.on_progress(&progress, last);
            }
        }

        Self::transition(&mut report, RunState::Completed);
        self.progress_port.on_finish(&report);
        Ok(report)
    }

    /// Validate inputs and compute every job's timing and destination
    /// without running the tool or touching the output directory.
    pub async fn plan(&self, manifest: &[u8], config: &RunConfig) -> Result<Vec<PlannedCut>, RunError> {
        Self::check_frame_rate(config.frame_rate)?;
        let output_dir = Self::absolute_output_dir(&config.output_directory)?;
        let jobs = self.manifest_port.parse(manifest)?;

        Ok(jobs
            .into_iter()
            .map(|job| match JobValidator::validate(&job) {
                Ok(()) => PlannedCut {
                    timing: Some(TimeCalculator::compute(&job, config.frame_rate)),
                    output_path: Some(self.resolver.resolve(
                        &output_dir,
                        &config.filename_prefix,
                        &job.filename_stem,
                    )),
                    problem: None,
                    job,
                },
                Err(problem) => PlannedCut {
                    job,
                    timing: None,
                    output_path: None,
                    problem: Some(problem),
                },
            })
            .collect())
    }

    /// Create every missing ancestor directory of `output_path` and clear
    /// any file an earlier run left there, so a tool that exits cleanly
    /// without writing is still caught as a missing output.
    pub async fn prepare_output(&self, output_path: &Path) -> Result<(), PathError> {
        if let Some(parent) = output_path.parent() {
            self.fs_port
                .create_directory(parent)
                .await
                .map_err(|source| PathError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        match self.fs_port.remove_file(output_path).await {
            Ok(()) => {
                debug!(path = %output_path.display(), "Removed existing output");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PathError::StaleOutput {
                path: output_path.to_path_buf(),
                source,
            }),
        }
    }

    async fn validate(&self, manifest: &[u8], config: &RunConfig) -> Result<(PathBuf, Vec<CutJob>), RunError> {
        Self::check_frame_rate(config.frame_rate)?;

        self.fs_port
            .check_readable_file(&config.source_video_path)
            .await
            .map_err(|e| {
                RunError::Precondition(format!(
                    "source video {} is not readable: {}",
                    config.source_video_path.display(),
                    e
                ))
            })?;

        let output_dir = Self::absolute_output_dir(&config.output_directory)?;
        if self.fs_port.file_exists(&output_dir).await {
            return Err(RunError::Precondition(format!(
                "output directory {} is an existing file",
                output_dir.display()
            )));
        }

        let jobs = self.manifest_port.parse(manifest)?;
        Ok((output_dir, jobs))
    }

    fn check_frame_rate(frame_rate: f64) -> Result<(), RunError> {
        if frame_rate.is_finite() && frame_rate > 0.0 {
            Ok(())
        } else {
            Err(RunError::Precondition(format!(
                "frame rate must be a positive number, got {}",
                frame_rate
            )))
        }
    }

    fn absolute_output_dir(output_directory: &Path) -> Result<PathBuf, RunError> {
        if output_directory.as_os_str().is_empty() {
            return Err(RunError::Precondition("output directory is empty".to_string()));
        }
        if output_directory.is_absolute() {
            return Ok(output_directory.to_path_buf());
        }
        let cwd = std::env::current_dir().map_err(|e| {
            RunError::Precondition(format!("cannot resolve output directory: {}", e))
        })?;
        Ok(cwd.join(output_directory))
    }

    async fn run_job(&self, job: CutJob, output_dir: &Path, config: &RunConfig) -> JobResult {
        let started = Instant::now();

        if let Err(reason) = JobValidator::validate(&job) {
            return JobResult::invalid(job, reason);
        }

        let timing = TimeCalculator::compute(&job, config.frame_rate);
        let output_path = self
            .resolver
            .resolve(output_dir, &config.filename_prefix, &job.filename_stem);

        let (outcome, diagnostic) = match self.prepare_output(&output_path).await {
            Ok(()) => {
                let cut = self
                    .executor
                    .execute(&config.source_video_path, timing, &output_path)
                    .await;
                (cut.outcome, cut.diagnostic)
            }
            Err(e) => (JobOutcome::OutputPathFailed, e.to_string()),
        };

        JobResult {
            job,
            timing: Some(timing),
            output_path: Some(output_path),
            outcome,
            diagnostic,
            elapsed: started.elapsed(),
        }
    }

    fn transition(report: &mut RunReport, next: RunState) {
        debug!(from = ?report.state, to = ?next, "Run state transition");
        if next.is_terminal() {
            report.finish(next);
        } else {
            report.state = next;
        }
    }
}

#[cfg(test)]
mod tests;
