//! Sequential extraction runner with progress events and cooperative cancellation

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::model::ExtractionJob;
use crate::error::{SplitterError, SplitterResult};
use crate::ports::ExtractPort;
use crate::utils::percent_complete;

/// Lifecycle of a runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunState {
    /// True once a run has ended, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Failed | RunState::Cancelled
        )
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every job succeeded
    Completed { completed: usize },
    /// The job built from segment `index` failed; later jobs were not attempted
    Failed {
        index: usize,
        error: SplitterError,
        completed: usize,
    },
    /// Cancellation was observed before a job started
    Cancelled { completed: usize },
}

impl RunOutcome {
    /// Terminal state matching this outcome
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Completed { .. } => RunState::Completed,
            RunOutcome::Failed { .. } => RunState::Failed,
            RunOutcome::Cancelled { .. } => RunState::Cancelled,
        }
    }

    /// Number of jobs that finished successfully
    pub fn completed(&self) -> usize {
        match self {
            RunOutcome::Completed { completed }
            | RunOutcome::Failed { completed, .. }
            | RunOutcome::Cancelled { completed } => *completed,
        }
    }
}

/// Events sent to the caller while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started { total: usize },
    JobStarted { index: usize, output_path: PathBuf },
    Progress {
        completed: usize,
        total: usize,
        percent: f64,
    },
    /// Always the last event of a run
    Finished(RunOutcome),
}

/// Shared cancellation flag, checked before each job
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The job in flight still runs to completion.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Caller side of a started run
#[derive(Debug)]
pub struct RunHandle {
    events: UnboundedReceiver<RunEvent>,
    cancel: CancelToken,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Next event, or `None` once the run has ended and all events were read
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Request cancellation before the next job
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this run, for use from another task
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the run to end
    pub async fn wait(self) -> SplitterResult<RunOutcome> {
        self.task
            .await
            .map_err(|e| SplitterError::execution(format!("Run task aborted: {}", e)))
    }
}

/// Executes extraction jobs one at a time on a background task
#[derive(Clone)]
pub struct JobRunner {
    extractor: Arc<dyn ExtractPort>,
    state: Arc<Mutex<RunState>>,
}

impl JobRunner {
    /// Create an idle runner
    pub fn new(extractor: Arc<dyn ExtractPort>) -> Self {
        Self {
            extractor,
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    /// Current state
    pub fn state(&self) -> RunState {
        *lock_state(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Start a run over `jobs` in ascending segment index order.
    ///
    /// Must be called from within a tokio runtime. Fails when `jobs` is empty
    /// or another run of this runner has not finished yet.
    pub fn start(&self, mut jobs: Vec<ExtractionJob>) -> SplitterResult<RunHandle> {
        if jobs.is_empty() {
            return Err(SplitterError::validation("No extraction jobs to run"));
        }

        {
            let mut state = lock_state(&self.state);
            if *state == RunState::Running {
                return Err(SplitterError::validation("A run is already in progress"));
            }
            *state = RunState::Running;
        }

        jobs.sort_by_key(|job| job.index);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();
        let task = tokio::spawn(execute(
            Arc::clone(&self.extractor),
            jobs,
            cancel.clone(),
            events_tx,
            Arc::clone(&self.state),
        ));

        Ok(RunHandle {
            events: events_rx,
            cancel,
            task,
        })
    }
}

async fn execute(
    extractor: Arc<dyn ExtractPort>,
    jobs: Vec<ExtractionJob>,
    cancel: CancelToken,
    events: UnboundedSender<RunEvent>,
    state: Arc<Mutex<RunState>>,
) -> RunOutcome {
    let guard = StateGuard { state };
    let total = jobs.len();
    info!("Starting run of {} extraction jobs", total);
    // A dropped receiver only means nobody is listening
    let _ = events.send(RunEvent::Started { total });

    let mut completed = 0;
    let mut outcome = None;

    for job in &jobs {
        if cancel.is_cancelled() {
            warn!("Run cancelled after {} of {} jobs", completed, total);
            outcome = Some(RunOutcome::Cancelled { completed });
            break;
        }

        info!(
            "Extracting segment {} [{:.3}s, {:.3}s) to {}",
            job.index,
            job.start_seconds,
            job.end_seconds,
            job.output_path.display()
        );
        let _ = events.send(RunEvent::JobStarted {
            index: job.index,
            output_path: job.output_path.clone(),
        });

        match extractor.extract(job).await {
            Ok(()) => {
                completed += 1;
                let _ = events.send(RunEvent::Progress {
                    completed,
                    total,
                    percent: percent_complete(completed, total),
                });
            }
            Err(err) => {
                error!("Segment {} failed: {}", job.index, err);
                outcome = Some(RunOutcome::Failed {
                    index: job.index,
                    error: err,
                    completed,
                });
                break;
            }
        }
    }

    let outcome = outcome.unwrap_or(RunOutcome::Completed { completed });
    if let RunOutcome::Completed { .. } = outcome {
        info!("Run completed: {} files written", completed);
    }

    guard.finish(&outcome);
    let _ = events.send(RunEvent::Finished(outcome.clone()));
    outcome
}

/// Marks the run failed if the task ends without recording an outcome
struct StateGuard {
    state: Arc<Mutex<RunState>>,
}

impl StateGuard {
    fn finish(&self, outcome: &RunOutcome) {
        *lock_state(&self.state) = outcome.state();
    }
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        if *state == RunState::Running {
            error!("Run ended without an outcome; marking it failed");
            *state = RunState::Failed;
        }
    }
}

fn lock_state(state: &Mutex<RunState>) -> MutexGuard<'_, RunState> {
    // The guarded value is a plain enum, valid even after a panic elsewhere
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
