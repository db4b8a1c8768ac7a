// Tracing log adapter - Structured logging using tracing crate

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::domain::model::*;
use crate::ports::*;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Output goes to stderr so
/// reports printed on stdout stay machine-readable.
pub fn init_logging(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Ignore the error when a subscriber is already installed
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Progress port that reports through tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingProgressAdapter {
    cancel: Arc<AtomicBool>,
}

impl TracingProgressAdapter {
    /// Create new tracing progress adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancel_flag(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    /// Request cancellation at the next job boundary
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

impl ProgressPort for TracingProgressAdapter {
    fn on_start(&self, total: usize) {
        info!(total, "Starting batch of {} cut jobs", total);
    }

    fn on_progress(&self, progress: &RunProgress, result: &JobResult) {
        let percent = progress.fraction() * 100.0;
        if result.outcome.is_success() {
            info!(
                completed = progress.completed,
                total = progress.total,
                "[{:5.1}%] {}",
                percent,
                progress.description
            );
        } else {
            warn!(
                completed = progress.completed,
                total = progress.total,
                outcome = %result.outcome,
                "[{:5.1}%] {}",
                percent,
                progress.description
            );
        }
    }

    fn on_finish(&self, report: &RunReport) {
        if report.failed() == 0 {
            info!("{}", report.summary());
        } else {
            error!("{}", report.summary());
        }
    }

    fn should_cancel(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}
