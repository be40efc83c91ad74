//! Progress reporting for extraction runs

use std::io::{self, Write};
use std::path::Path;

use crate::engine::runner::{RunEvent, RunOutcome};
use crate::error::{SplitterError, SplitterResult};

/// Renders run events for a user interface
pub trait ProgressReporter: Send {
    /// Called when the run starts
    fn on_start(&mut self, total: usize) -> SplitterResult<()>;

    /// Called before each job
    fn on_job_start(&mut self, index: usize, output_path: &Path) -> SplitterResult<()>;

    /// Called after each successful job
    fn on_progress(&mut self, completed: usize, total: usize, percent: f64)
        -> SplitterResult<()>;

    /// Called when every job succeeded
    fn on_complete(&mut self, completed: usize) -> SplitterResult<()>;

    /// Called when a job failed
    fn on_error(&mut self, index: usize, error: &SplitterError, completed: usize)
        -> SplitterResult<()>;

    /// Called when the run was cancelled between jobs
    fn on_cancel(&mut self, completed: usize) -> SplitterResult<()>;

    /// Route one event to the matching callback
    fn report(&mut self, event: &RunEvent) -> SplitterResult<()> {
        match event {
            RunEvent::Started { total } => self.on_start(*total),
            RunEvent::JobStarted { index, output_path } => self.on_job_start(*index, output_path),
            RunEvent::Progress {
                completed,
                total,
                percent,
            } => self.on_progress(*completed, *total, *percent),
            RunEvent::Finished(RunOutcome::Completed { completed }) => self.on_complete(*completed),
            RunEvent::Finished(RunOutcome::Failed {
                index,
                error,
                completed,
            }) => self.on_error(*index, error, *completed),
            RunEvent::Finished(RunOutcome::Cancelled { completed }) => self.on_cancel(*completed),
        }
    }
}

/// Console progress reporter for CLI usage
pub struct ConsoleReporter<W: Write + Send = io::Stdout> {
    out: W,
    verbose: bool,
}

impl ConsoleReporter {
    /// Reporter writing to stdout
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

const BAR_LENGTH: usize = 20;

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_LENGTH as f64).round() as usize;
    let filled = filled.min(BAR_LENGTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_LENGTH - filled))
}

impl<W: Write + Send> ProgressReporter for ConsoleReporter<W> {
    fn on_start(&mut self, total: usize) -> SplitterResult<()> {
        writeln!(self.out, "Extracting {} segments", total)?;
        Ok(())
    }

    fn on_job_start(&mut self, index: usize, output_path: &Path) -> SplitterResult<()> {
        if self.verbose {
            writeln!(
                self.out,
                "  segment {} -> {}",
                index + 1,
                output_path.display()
            )?;
        }
        Ok(())
    }

    fn on_progress(
        &mut self,
        completed: usize,
        total: usize,
        percent: f64,
    ) -> SplitterResult<()> {
        writeln!(
            self.out,
            "[{}] {:>5.1}% ({}/{})",
            progress_bar(percent),
            percent,
            completed,
            total
        )?;
        Ok(())
    }

    fn on_complete(&mut self, completed: usize) -> SplitterResult<()> {
        writeln!(self.out, "Done: {} files written", completed)?;
        Ok(())
    }

    fn on_error(
        &mut self,
        index: usize,
        error: &SplitterError,
        completed: usize,
    ) -> SplitterResult<()> {
        writeln!(
            self.out,
            "Failed on segment {} after {} files: {}",
            index + 1,
            completed,
            error
        )?;
        Ok(())
    }

    fn on_cancel(&mut self, completed: usize) -> SplitterResult<()> {
        writeln!(self.out, "Cancelled after {} files", completed)?;
        Ok(())
    }
}

/// JSON progress reporter, one object per line
pub struct JsonReporter<W: Write + Send = io::Stdout> {
    out: W,
}

impl JsonReporter {
    /// Reporter writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, mut event: serde_json::Value) -> SplitterResult<()> {
        if let Some(object) = event.as_object_mut() {
            object.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        writeln!(self.out, "{}", event)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ProgressReporter for JsonReporter<W> {
    fn on_start(&mut self, total: usize) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "start",
            "total": total,
        }))
    }

    fn on_job_start(&mut self, index: usize, output_path: &Path) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "job_start",
            "index": index,
            "output_path": output_path.to_string_lossy(),
        }))
    }

    fn on_progress(
        &mut self,
        completed: usize,
        total: usize,
        percent: f64,
    ) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "progress",
            "completed": completed,
            "total": total,
            "percent": percent,
        }))
    }

    fn on_complete(&mut self, completed: usize) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "complete",
            "completed": completed,
        }))
    }

    fn on_error(
        &mut self,
        index: usize,
        error: &SplitterError,
        completed: usize,
    ) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "error",
            "index": index,
            "error": error.to_string(),
            "completed": completed,
        }))
    }

    fn on_cancel(&mut self, completed: usize) -> SplitterResult<()> {
        self.emit(serde_json::json!({
            "event": "cancel",
            "completed": completed,
        }))
    }
}
