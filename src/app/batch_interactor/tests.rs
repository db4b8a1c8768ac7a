// Batch interactor tests with scripted tool and progress ports

use std::collections::HashSet;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::adapters::{CsvManifestAdapter, FsLocalAdapter};

/// Writes the output file like a real cutter, except for listed file names
struct ScriptedTool {
    fail: HashSet<String>,
    silent: HashSet<String>,
    calls: Mutex<Vec<CutRequest>>,
}

impl ScriptedTool {
    fn new() -> Self {
        Self {
            fail: HashSet::new(),
            silent: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(mut self, file_name: &str) -> Self {
        self.fail.insert(file_name.to_string());
        self
    }

    fn silently_failing(mut self, file_name: &str) -> Self {
        self.silent.insert(file_name.to_string());
        self
    }

    fn calls(&self) -> Vec<CutRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CutToolPort for ScriptedTool {
    async fn run_cut(&self, request: &CutRequest) -> io::Result<ToolExit> {
        self.calls.lock().unwrap().push(request.clone());
        let name = request
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.fail.contains(&name) {
            return Ok(ToolExit {
                success: false,
                code: Some(1),
                stderr: "Conversion failed!".to_string(),
            });
        }
        if !self.silent.contains(&name) {
            std::fs::write(&request.output, b"clip")?;
        }
        Ok(ToolExit {
            success: true,
            code: Some(0),
            stderr: String::new(),
        })
    }

    fn tool_name(&self) -> String {
        "scripted".to_string()
    }
}

#[derive(Default)]
struct RecordingProgress {
    started: Mutex<Option<usize>>,
    updates: Mutex<Vec<RunProgress>>,
    finished: Mutex<Option<RunState>>,
    cancel_after: Option<usize>,
}

impl ProgressPort for RecordingProgress {
    fn on_start(&self, total: usize) {
        *self.started.lock().unwrap() = Some(total);
    }

    fn on_progress(&self, progress: &RunProgress, _result: &JobResult) {
        self.updates.lock().unwrap().push(progress.clone());
    }

    fn on_finish(&self, report: &RunReport) {
        *self.finished.lock().unwrap() = Some(report.state);
    }

    fn should_cancel(&self) -> bool {
        match self.cancel_after {
            Some(limit) => self.updates.lock().unwrap().len() >= limit,
            None => false,
        }
    }
}

struct Fixture {
    temp: TempDir,
    tool: Arc<ScriptedTool>,
    progress: Arc<RecordingProgress>,
    interactor: BatchInteractor,
}

impl Fixture {
    fn new(tool: ScriptedTool) -> Self {
        Self::with_progress(tool, RecordingProgress::default())
    }

    fn with_progress(tool: ScriptedTool, progress: RecordingProgress) -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("source.mp4"), b"video").unwrap();

        let tool = Arc::new(tool);
        let progress = Arc::new(progress);
        let interactor = BatchInteractor::new(
            Arc::new(CsvManifestAdapter::new()),
            Arc::clone(&tool) as Arc<dyn CutToolPort>,
            Arc::new(FsLocalAdapter::new()),
            Arc::clone(&progress) as Arc<dyn ProgressPort>,
            OutputPathResolver::default(),
        );
        Self {
            temp,
            tool,
            progress,
            interactor,
        }
    }

    fn config(&self) -> RunConfig {
        RunConfig::new(self.temp.path().join("source.mp4"), self.temp.path().join("out"), 30.0)
    }
}

fn manifest(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut text = String::from("start_frame,end_frame,filename\n");
    for (start, end, name) in rows {
        text.push_str(&format!("{},{},{}\n", start, end, name));
    }
    text.into_bytes()
}

const SIX_ROWS: [(&str, &str, &str); 6] = [
    ("0", "30", "c1"),
    ("30", "60", "c2"),
    ("60", "90", "c3"),
    ("90", "120", "c4"),
    ("120", "150", "c5"),
    ("150", "180", "c6"),
];

#[tokio::test]
async fn test_one_tool_failure_does_not_abort_run() {
    let fixture = Fixture::new(ScriptedTool::new().failing("c4.mov"));
    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.results.len(), 6);
    assert_eq!(report.count(JobOutcome::Success), 5);
    assert_eq!(report.count(JobOutcome::ToolReportedFailure), 1);
    assert_eq!(report.results[3].outcome, JobOutcome::ToolReportedFailure);
    assert!(report.results[3].diagnostic.contains("Conversion failed!"));

    let names: Vec<&str> = report.results.iter().map(|r| r.job.filename_stem.as_str()).collect();
    assert_eq!(names, vec!["c1", "c2", "c3", "c4", "c5", "c6"]);
    assert_eq!(fixture.tool.calls().len(), 6);
}

#[tokio::test]
async fn test_progress_reported_after_every_job() {
    let fixture = Fixture::new(ScriptedTool::new());
    fixture
        .interactor
        .run(&manifest(&SIX_ROWS[..3]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(*fixture.progress.started.lock().unwrap(), Some(3));
    let updates = fixture.progress.updates.lock().unwrap();
    let fractions: Vec<f64> = updates.iter().map(RunProgress::fraction).collect();
    assert_eq!(fractions, vec![1.0 / 3.0, 2.0 / 3.0, 1.0]);
    assert!(updates[1].description.contains("c2"));
    assert_eq!(*fixture.progress.finished.lock().unwrap(), Some(RunState::Completed));
}

#[tokio::test]
async fn test_timing_and_paths_passed_to_tool() {
    let fixture = Fixture::new(ScriptedTool::new());
    let config = fixture.config().with_prefix("take1");
    let report = fixture
        .interactor
        .run(&manifest(&[("300", "600", "clipA")]), &config)
        .await
        .unwrap();

    let calls = fixture.tool.calls();
    assert_eq!(calls[0].source, config.source_video_path);
    assert_eq!(calls[0].timing.start_time, 10.0);
    assert_eq!(calls[0].timing.duration, 10.0);
    assert_eq!(calls[0].output, fixture.temp.path().join("out").join("take1_clipA.mov"));
    assert!(calls[0].output.is_file());
    assert_eq!(report.results[0].output_path.as_ref(), Some(&calls[0].output));
}

#[tokio::test]
async fn test_nested_stems_create_subdirectories() {
    let fixture = Fixture::new(ScriptedTool::new());
    let report = fixture
        .interactor
        .run(&manifest(&[("0", "10", "scene1/shot2")]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, JobOutcome::Success);
    assert!(fixture.temp.path().join("out/scene1/shot2.mov").is_file());
}

#[tokio::test]
async fn test_silent_tool_failure_is_flagged_not_success() {
    let fixture = Fixture::new(ScriptedTool::new().silently_failing("c2.mov"));
    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS[..3]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.results[1].outcome, JobOutcome::OutputFileMissing);
    assert_eq!(report.succeeded(), 2);
}

#[tokio::test]
async fn test_leftover_output_does_not_mask_silent_failure() {
    let fixture = Fixture::new(ScriptedTool::new().silently_failing("c1.mov"));
    let out = fixture.temp.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("c1.mov"), b"from an earlier run").unwrap();

    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS[..1]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, JobOutcome::OutputFileMissing);
    assert!(!out.join("c1.mov").exists());
}

#[tokio::test]
async fn test_leftover_output_is_replaced_on_success() {
    let fixture = Fixture::new(ScriptedTool::new());
    let out = fixture.temp.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("c1.mov"), b"from an earlier run").unwrap();

    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS[..1]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, JobOutcome::Success);
    assert_eq!(std::fs::read(out.join("c1.mov")).unwrap(), b"clip");
}

#[tokio::test]
async fn test_output_path_that_is_a_directory_fails_only_that_job() {
    let fixture = Fixture::new(ScriptedTool::new());
    let out = fixture.temp.path().join("out");
    std::fs::create_dir_all(out.join("c1.mov")).unwrap();

    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS[..2]), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, JobOutcome::OutputPathFailed);
    assert!(report.results[0].diagnostic.contains("Failed to remove existing output"));
    assert_eq!(report.results[1].outcome, JobOutcome::Success);
    assert_eq!(fixture.tool.calls().len(), 1);
}

#[tokio::test]
async fn test_invalid_rows_are_recorded_and_skipped() {
    let fixture = Fixture::new(ScriptedTool::new());
    let rows = [("0", "30", "good"), ("90", "30", "reversed"), ("0", "10", ""), ("30", "60", "also_good")];
    let report = fixture
        .interactor
        .run(&manifest(&rows), &fixture.config())
        .await
        .unwrap();

    let outcomes: Vec<JobOutcome> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            JobOutcome::Success,
            JobOutcome::ValidationError,
            JobOutcome::ValidationError,
            JobOutcome::Success,
        ]
    );
    assert_eq!(fixture.tool.calls().len(), 2);
}

#[tokio::test]
async fn test_directory_failure_fails_only_that_job() {
    let fixture = Fixture::new(ScriptedTool::new());
    let out = fixture.temp.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("blocked"), b"not a directory").unwrap();

    let rows = [("0", "30", "blocked/clip"), ("30", "60", "fine")];
    let report = fixture
        .interactor
        .run(&manifest(&rows), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, JobOutcome::OutputPathFailed);
    assert_eq!(report.results[1].outcome, JobOutcome::Success);
}

#[tokio::test]
async fn test_bad_manifest_aborts_with_no_jobs() {
    let fixture = Fixture::new(ScriptedTool::new());
    let rows = [("0", "30", "a"), ("x", "60", "b")];
    let err = fixture
        .interactor
        .run(&manifest(&rows), &fixture.config())
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Manifest(ManifestError::TypeMismatch { row: 2, .. })));
    assert!(fixture.tool.calls().is_empty());
    assert!(fixture.progress.started.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_missing_source_aborts() {
    let fixture = Fixture::new(ScriptedTool::new());
    let mut config = fixture.config();
    config.source_video_path = fixture.temp.path().join("missing.mp4");

    let err = fixture
        .interactor
        .run(&manifest(&SIX_ROWS), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Precondition(_)));
    assert!(fixture.tool.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_frame_rates_abort() {
    let fixture = Fixture::new(ScriptedTool::new());
    for rate in [0.0, -24.0, f64::NAN, f64::INFINITY] {
        let mut config = fixture.config();
        config.frame_rate = rate;
        let err = fixture
            .interactor
            .run(&manifest(&SIX_ROWS), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Precondition(_)), "rate {}", rate);
    }
    assert!(fixture.tool.calls().is_empty());
}

#[tokio::test]
async fn test_output_directory_that_is_a_file_aborts() {
    let fixture = Fixture::new(ScriptedTool::new());
    let mut config = fixture.config();
    config.output_directory = config.source_video_path.clone();

    let err = fixture
        .interactor
        .run(&manifest(&SIX_ROWS), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Precondition(_)));
}

#[tokio::test]
async fn test_cancellation_stops_at_job_boundary() {
    let progress = RecordingProgress {
        cancel_after: Some(2),
        ..Default::default()
    };
    let fixture = Fixture::with_progress(ScriptedTool::new(), progress);
    let report = fixture
        .interactor
        .run(&manifest(&SIX_ROWS), &fixture.config())
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Cancelled);
    assert_eq!(report.jobs_completed, 2);
    assert_eq!(report.jobs_total, 6);
    assert_eq!(fixture.tool.calls().len(), 2);
    assert_eq!(*fixture.progress.finished.lock().unwrap(), Some(RunState::Cancelled));
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_prepare_output_twice_is_idempotent() {
    let fixture = Fixture::new(ScriptedTool::new());
    let path = fixture.temp.path().join("out").join("deep").join("clip.mov");

    fixture.interactor.prepare_output(&path).await.unwrap();
    fixture.interactor.prepare_output(&path).await.unwrap();
    assert!(path.parent().unwrap().is_dir());
}

#[tokio::test]
async fn test_plan_does_not_invoke_tool_or_create_directories() {
    let fixture = Fixture::new(ScriptedTool::new());
    let rows = [("300", "600", "clipA"), ("10", "5", "bad")];
    let plan = fixture
        .interactor
        .plan(&manifest(&rows), &fixture.config())
        .await
        .unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(
        plan[0].timing,
        Some(CutTiming {
            start_time: 10.0,
            duration: 10.0
        })
    );
    assert_eq!(plan[0].output_path, Some(fixture.temp.path().join("out").join("clipA.mov")));
    assert!(plan[1].problem.is_some());
    assert!(fixture.tool.calls().is_empty());
    assert!(!fixture.temp.path().join("out").exists());
}
