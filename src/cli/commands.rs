//! Command implementations

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::adapters::{Settings, TomlConfigAdapter, TracingProgressAdapter};
use crate::app::{AppContainer, DefaultAppContainer, PlannedCut};
use crate::cli::args::{CheckArgs, RunArgs, SettingsArgs};
use crate::domain::model::{RunConfig, RunReport, RunState};
use crate::utils::Utils;

/// Execute the run command
pub async fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Starting batch run");
    info!("Source: {}", args.source.display());
    info!("Manifest: {}", args.manifest.display());
    info!("Output: {}", args.output_dir.display());

    let mut settings = load_settings(config_path, &args.settings)?;
    if let Some(tool) = args.tool {
        settings.tool = tool;
    }

    let manifest = tokio::fs::read(&args.manifest)
        .await
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;

    let cancel = Arc::new(AtomicBool::new(false));
    watch_for_interrupt(Arc::clone(&cancel));
    let progress = Arc::new(TracingProgressAdapter::with_cancel_flag(cancel));

    let container = DefaultAppContainer::new(&settings, progress).context("Invalid settings")?;
    let run_config = RunConfig::new(args.source, args.output_dir, args.fps).with_prefix(args.prefix);

    let report = container
        .batch_interactor()
        .run(&manifest, &run_config)
        .await
        .context("Batch run aborted")?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{}", json);
    } else {
        display_report(&report);
    }

    if report.state == RunState::Cancelled {
        bail!(
            "Run cancelled after {} of {} jobs",
            report.jobs_completed,
            report.jobs_total
        );
    }
    if report.failed() > 0 {
        bail!("{} of {} jobs failed", report.failed(), report.jobs_total);
    }

    info!("Batch run completed successfully");
    Ok(())
}

/// Execute the check command
pub async fn check(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Checking manifest {}", args.manifest.display());

    let settings = load_settings(config_path, &args.settings)?;
    let manifest = tokio::fs::read(&args.manifest)
        .await
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;

    let container = DefaultAppContainer::new(&settings, Arc::new(TracingProgressAdapter::new()))
        .context("Invalid settings")?;
    // Source is never opened by a dry run
    let run_config = RunConfig::new("", args.output_dir, args.fps).with_prefix(args.prefix);

    let plan = container
        .batch_interactor()
        .plan(&manifest, &run_config)
        .await
        .context("Manifest check failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan to JSON")?;
        println!("{}", json);
    } else {
        display_plan(&plan);
    }

    let rejected = plan.iter().filter(|p| p.problem.is_some()).count();
    if rejected > 0 {
        bail!("{} of {} rows would be rejected", rejected, plan.len());
    }
    Ok(())
}

/// Resolve settings: defaults < file < environment < command line
fn load_settings(config_path: Option<&Path>, overrides: &SettingsArgs) -> Result<Settings> {
    let mut settings = TomlConfigAdapter::load(config_path).context("Failed to load settings")?;
    if let Some(ext) = &overrides.ext {
        settings.container_ext = ext.clone();
    }
    if let Some(delimiter) = overrides.delimiter {
        settings.delimiter = delimiter;
    }
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

/// Turn Ctrl-C into a cancellation request honoured between jobs
fn watch_for_interrupt(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current job");
            cancel.store(true, Ordering::SeqCst);
        }
    });
}

/// Display the run log in human-readable format
fn display_report(report: &RunReport) {
    println!("Run Report");
    println!("==========");
    for result in &report.results {
        println!("{} [{}]", result.log_line(), Utils::format_duration(result.elapsed));
    }
    println!();
    println!(
        "{} ({:.0}% attempted)",
        report.summary(),
        Utils::calculate_progress(report.jobs_completed, report.jobs_total)
    );
}

/// Display planned cuts in human-readable format
fn display_plan(plan: &[PlannedCut]) {
    println!("Planned Cuts");
    println!("============");
    for cut in plan {
        match (&cut.timing, &cut.output_path, &cut.problem) {
            (Some(timing), Some(path), None) => println!(
                "  {} start {} duration {} -> {}",
                cut.job,
                Utils::format_timestamp(timing.start_time),
                Utils::format_timestamp(timing.duration),
                path.display()
            ),
            (_, _, Some(problem)) => println!("  {} rejected: {}", cut.job, problem),
            _ => println!("  {}", cut.job),
        }
    }
}
