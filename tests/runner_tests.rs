use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use lossless_splitter::ports::ExtractPort;
use lossless_splitter::{
    ExtractionJob, JobRunner, RunEvent, RunOutcome, RunState, SplitterError, SplitterResult,
};

/// Scripted extractor: writes a file per job unless the job index is set to fail
struct ScriptedExtractor {
    fail_on: HashSet<usize>,
    attempted: Mutex<Vec<usize>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedExtractor {
    fn new() -> Self {
        Self {
            fail_on: HashSet::new(),
            attempted: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn failing_on(index: usize) -> Self {
        Self {
            fail_on: HashSet::from([index]),
            ..Self::new()
        }
    }

    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    fn attempted(&self) -> Vec<usize> {
        self.attempted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractPort for ScriptedExtractor {
    async fn extract(&self, job: &ExtractionJob) -> SplitterResult<()> {
        self.attempted.lock().unwrap().push(job.index);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_on.contains(&job.index) {
            return Err(SplitterError::execution("Invalid data found when processing input"));
        }
        std::fs::write(&job.output_path, b"segment")?;
        Ok(())
    }
}

fn jobs(dir: &TempDir, count: usize) -> Vec<ExtractionJob> {
    (0..count)
        .map(|index| ExtractionJob {
            index,
            source_path: PathBuf::from("/media/source.mp4"),
            start_seconds: index as f64 * 10.0,
            end_seconds: (index + 1) as f64 * 10.0,
            output_path: dir.path().join(format!("source_segment_{}.mp4", index + 1)),
        })
        .collect()
}

async fn collect_events(handle: &mut lossless_splitter::RunHandle) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_all_jobs_complete_with_monotonic_progress() {
    let dir = TempDir::new().unwrap();
    let runner = JobRunner::new(Arc::new(ScriptedExtractor::new()));
    let mut handle = runner.start(jobs(&dir, 4)).unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(events.first(), Some(&RunEvent::Started { total: 4 }));
    assert_eq!(
        events.last(),
        Some(&RunEvent::Finished(RunOutcome::Completed { completed: 4 }))
    );

    let percents: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![25.0, 50.0, 75.0, 100.0]);
    assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));

    handle.wait().await.unwrap();
    assert_eq!(runner.state(), RunState::Completed);
    for job in jobs(&dir, 4) {
        assert!(job.output_path.exists());
    }
}

#[tokio::test]
async fn test_failure_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let extractor = Arc::new(ScriptedExtractor::failing_on(1));
    let runner = JobRunner::new(Arc::clone(&extractor) as Arc<dyn ExtractPort>);
    let planned = jobs(&dir, 3);

    let mut handle = runner.start(planned.clone()).unwrap();
    let events = collect_events(&mut handle).await;
    let outcome = handle.wait().await.unwrap();

    match &outcome {
        RunOutcome::Failed {
            index,
            error,
            completed,
        } => {
            assert_eq!(*index, 1);
            assert_eq!(*completed, 1);
            assert!(error.to_string().contains("Invalid data found"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(runner.state(), RunState::Failed);
    assert_eq!(extractor.attempted(), vec![0, 1]);

    assert!(planned[0].output_path.exists());
    assert!(!planned[2].output_path.exists());

    // Progress never reached 100
    assert!(events.iter().all(|event| !matches!(
        event,
        RunEvent::Progress { percent, .. } if *percent >= 100.0
    )));
}

#[tokio::test]
async fn test_cancel_during_first_job_keeps_its_output() {
    let dir = TempDir::new().unwrap();
    let gate = Arc::new(Semaphore::new(0));
    let extractor = Arc::new(ScriptedExtractor::gated(Arc::clone(&gate)));
    let runner = JobRunner::new(Arc::clone(&extractor) as Arc<dyn ExtractPort>);
    let planned = jobs(&dir, 3);

    let mut handle = runner.start(planned.clone()).unwrap();
    assert_eq!(handle.next_event().await, Some(RunEvent::Started { total: 3 }));
    assert!(matches!(
        handle.next_event().await,
        Some(RunEvent::JobStarted { index: 0, .. })
    ));

    // Job 0 is in flight; cancel, then let it finish
    handle.cancel();
    gate.add_permits(1);

    let events = collect_events(&mut handle).await;
    assert_eq!(
        events.last(),
        Some(&RunEvent::Finished(RunOutcome::Cancelled { completed: 1 }))
    );
    assert_eq!(
        handle.wait().await.unwrap(),
        RunOutcome::Cancelled { completed: 1 }
    );
    assert_eq!(runner.state(), RunState::Cancelled);
    assert_eq!(extractor.attempted(), vec![0]);
    assert!(planned[0].output_path.exists());
    assert!(!planned[1].output_path.exists());
}

#[tokio::test]
async fn test_cancel_before_first_job_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let gate = Arc::new(Semaphore::new(0));
    let extractor = Arc::new(ScriptedExtractor::gated(Arc::clone(&gate)));
    let runner = JobRunner::new(Arc::clone(&extractor) as Arc<dyn ExtractPort>);

    // The current-thread test runtime does not poll the run task until we yield
    let handle = runner.start(jobs(&dir, 2)).unwrap();
    handle.cancel();

    assert_eq!(
        handle.wait().await.unwrap(),
        RunOutcome::Cancelled { completed: 0 }
    );
    assert!(extractor.attempted().is_empty());
}

#[tokio::test]
async fn test_second_start_while_running_is_rejected() {
    let dir = TempDir::new().unwrap();
    let gate = Arc::new(Semaphore::new(0));
    let runner = JobRunner::new(Arc::new(ScriptedExtractor::gated(Arc::clone(&gate))));

    let handle = runner.start(jobs(&dir, 1)).unwrap();
    assert_eq!(runner.state(), RunState::Running);
    assert!(matches!(
        runner.start(jobs(&dir, 1)),
        Err(SplitterError::Validation { .. })
    ));

    gate.add_permits(1);
    handle.wait().await.unwrap();
    assert!(runner.start(jobs(&dir, 1)).is_ok());
    gate.add_permits(1);
}

struct PanickingExtractor;

#[async_trait]
impl ExtractPort for PanickingExtractor {
    async fn extract(&self, _job: &ExtractionJob) -> SplitterResult<()> {
        panic!("decoder crashed");
    }
}

#[tokio::test]
async fn test_panicking_extractor_leaves_runner_restartable() {
    let dir = TempDir::new().unwrap();
    let runner = JobRunner::new(Arc::new(PanickingExtractor));

    let mut handle = runner.start(jobs(&dir, 2)).unwrap();
    let events = collect_events(&mut handle).await;
    assert!(!events
        .iter()
        .any(|event| matches!(event, RunEvent::Finished(_))));
    assert!(matches!(
        handle.wait().await,
        Err(SplitterError::Execution { .. })
    ));
    assert_eq!(runner.state(), RunState::Failed);

    let handle = runner.start(jobs(&dir, 1)).unwrap();
    assert!(handle.wait().await.is_err());
    assert_eq!(runner.state(), RunState::Failed);
}

#[tokio::test]
async fn test_empty_run_is_rejected() {
    let runner = JobRunner::new(Arc::new(ScriptedExtractor::new()));
    assert!(matches!(
        runner.start(Vec::new()),
        Err(SplitterError::Validation { .. })
    ));
    assert_eq!(runner.state(), RunState::Idle);
}
