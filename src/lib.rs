//! ClipBatch Library
//!
//! Batch extraction of sub-clips from a single source video. A CSV manifest
//! lists frame ranges and output names; each row becomes one stream-copy
//! invocation of an external tool, and every row's outcome is collected into a
//! [`RunReport`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{BatchInteractor, DefaultAppContainer};
pub use domain::errors::{ConfigError, ManifestError, PathError, RunError};
pub use domain::model::{CutJob, CutTiming, JobOutcome, JobResult, RunConfig, RunProgress, RunReport, RunState};
