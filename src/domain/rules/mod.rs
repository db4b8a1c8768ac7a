// Domain rules - Frame timing, output naming and row validation

use std::path::{Component, Path, PathBuf};

use crate::domain::model::*;

/// Default container for stream-copied clips
pub const DEFAULT_CONTAINER_EXT: &str = "mov";

/// Converts frame indices into seconds
pub struct TimeCalculator;

impl TimeCalculator {
    /// Compute start time and duration for a job at the given frame rate.
    ///
    /// `frame_rate` must already be validated as positive.
    pub fn compute(job: &CutJob, frame_rate: f64) -> CutTiming {
        CutTiming {
            start_time: job.start_frame / frame_rate,
            duration: (job.end_frame - job.start_frame) / frame_rate,
        }
    }

    /// Format seconds for the external tool with sub-frame precision
    pub fn format_seconds(seconds: f64) -> String {
        format!("{:.6}", seconds)
    }
}

/// Derives destination file names for cut jobs
#[derive(Debug, Clone)]
pub struct OutputPathResolver {
    container_ext: String,
}

impl Default for OutputPathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_EXT)
    }
}

impl OutputPathResolver {
    /// Create a resolver producing files with the given extension
    pub fn new(container_ext: impl Into<String>) -> Self {
        let ext: String = container_ext.into();
        Self {
            container_ext: ext.trim_start_matches('.').to_string(),
        }
    }

    /// File name for a stem, with the prefix joined by an underscore when present
    pub fn file_name(&self, prefix: &str, filename_stem: &str) -> String {
        if prefix.is_empty() {
            format!("{}.{}", filename_stem, self.container_ext)
        } else {
            format!("{}_{}.{}", prefix, filename_stem, self.container_ext)
        }
    }

    /// Full destination path inside `output_directory`.
    ///
    /// A stem such as `scene1/shot2` keeps its subdirectory; the prefix is
    /// applied to the last component only.
    pub fn resolve(&self, output_directory: &Path, prefix: &str, filename_stem: &str) -> PathBuf {
        let stem_path = Path::new(filename_stem);
        let name = stem_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename_stem.to_string());

        let directory = match stem_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => output_directory.join(parent),
            None => output_directory.to_path_buf(),
        };
        directory.join(self.file_name(prefix, &name))
    }
}

/// Row-level checks applied before a job runs
pub struct JobValidator;

impl JobValidator {
    /// Validate a parsed row. The error string becomes the job's diagnostic.
    pub fn validate(job: &CutJob) -> Result<(), String> {
        if !job.start_frame.is_finite() || !job.end_frame.is_finite() {
            return Err("frame values must be finite numbers".to_string());
        }
        if job.start_frame < 0.0 {
            return Err(format!("start_frame {} is negative", job.start_frame));
        }
        if job.end_frame < job.start_frame {
            return Err(format!(
                "end_frame {} is before start_frame {}",
                job.end_frame, job.start_frame
            ));
        }
        Self::validate_stem(&job.filename_stem)
    }

    /// Stems may name subdirectories but must stay inside the output directory
    fn validate_stem(stem: &str) -> Result<(), String> {
        if stem.trim().is_empty() {
            return Err("filename is empty".to_string());
        }
        let path = Path::new(stem);
        if path.file_name().is_none() {
            return Err(format!("filename '{}' does not name a file", stem));
        }
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(format!("filename '{}' escapes the output directory", stem))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(format!("filename '{}' must be relative", stem))
                }
            }
        }
        Ok(())
    }
}
