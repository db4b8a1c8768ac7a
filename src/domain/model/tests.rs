// Unit tests for domain models

use super::*;

fn result_with(index: usize, outcome: JobOutcome) -> JobResult {
    JobResult {
        job: CutJob::new(index, 0.0, 30.0, format!("clip{}", index)),
        timing: Some(CutTiming {
            start_time: 0.0,
            duration: 1.0,
        }),
        output_path: Some(PathBuf::from(format!("/out/clip{}.mov", index))),
        outcome,
        diagnostic: String::new(),
        elapsed: Duration::from_millis(5),
    }
}

#[test]
fn test_cut_job_display_is_one_based() {
    let job = CutJob::new(2, 10.0, 20.0, "clipC");
    assert_eq!(job.to_string(), "#3 'clipC' frames 10-20");
}

#[test]
fn test_run_config_prefix_defaults_empty() {
    let config = RunConfig::new("in.mp4", "/out", 30.0);
    assert!(config.filename_prefix.is_empty());

    let config = config.with_prefix("take1");
    assert_eq!(config.filename_prefix, "take1");
}

#[test]
fn test_report_counts_outcomes() {
    let mut report = RunReport::new(4);
    report.record(result_with(0, JobOutcome::Success));
    report.record(result_with(1, JobOutcome::ToolReportedFailure));
    report.record(result_with(2, JobOutcome::OutputFileMissing));
    report.record(result_with(3, JobOutcome::Success));

    assert_eq!(report.jobs_completed, 4);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.count(JobOutcome::OutputFileMissing), 1);
}

#[test]
fn test_progress_fraction() {
    let mut report = RunReport::new(4);
    assert_eq!(report.progress().fraction(), 0.0);

    report.record(result_with(0, JobOutcome::Success));
    let progress = report.progress();
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.fraction(), 0.25);
    assert!(progress.description.contains("clip0"));
}

#[test]
fn test_progress_fraction_for_empty_run_is_complete() {
    let progress = RunProgress {
        completed: 0,
        total: 0,
        description: String::new(),
    };
    assert_eq!(progress.fraction(), 1.0);
}

#[test]
fn test_log_line_includes_diagnostic() {
    let mut result = result_with(0, JobOutcome::ToolReportedFailure);
    result.diagnostic = "exit status 1".to_string();

    let line = result.log_line();
    assert!(line.starts_with("[tool failed]"));
    assert!(line.contains("/out/clip0.mov"));
    assert!(line.ends_with(": exit status 1"));
}

#[test]
fn test_invalid_result_has_no_timing() {
    let result = JobResult::invalid(CutJob::new(0, 50.0, 10.0, "bad"), "end before start");
    assert_eq!(result.outcome, JobOutcome::ValidationError);
    assert!(result.timing.is_none());
    assert!(result.log_line().contains("-> -"));
}

#[test]
fn test_summary_marks_cancelled_runs() {
    let mut report = RunReport::new(3);
    report.record(result_with(0, JobOutcome::Success));
    report.finish(RunState::Cancelled);

    assert!(report.state.is_terminal());
    assert!(report.finished_at.is_some());
    assert_eq!(
        report.summary(),
        "1 of 3 jobs attempted: 1 succeeded, 0 failed (cancelled)"
    );
    assert_eq!(report.log_lines().len(), 2);
}

#[test]
fn test_report_serializes_outcomes_in_snake_case() {
    let mut report = RunReport::new(1);
    report.record(result_with(0, JobOutcome::OutputFileMissing));
    report.finish(RunState::Completed);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["state"]["state"], "completed");
    assert_eq!(json["results"][0]["outcome"], "output_file_missing");
    assert_eq!(json["results"][0]["elapsed"], 0.005);
}
