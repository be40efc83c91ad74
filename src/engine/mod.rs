//! Run engine: executes extraction jobs and reports their progress

pub mod progress;
pub mod runner;

pub use progress::{ConsoleReporter, JsonReporter, ProgressReporter};
pub use runner::{CancelToken, JobRunner, RunEvent, RunHandle, RunOutcome, RunState};
