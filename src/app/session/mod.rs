// Editor session - Owns the cut timeline, derived segments and run state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::model::{ExtractionJob, ProjectState, Segment, Tag};
use crate::domain::segments;
use crate::domain::timeline::{validate_duration, CutTimeline};
use crate::engine::{JobRunner, RunHandle, RunState};
use crate::error::{SplitterError, SplitterResult};
use crate::planner::{build_jobs, NamingRules};
use crate::ports::{ExtractPort, LoadedProject};
use crate::utils::path::{file_stem, validate_segment_name};

/// The media file a session edits
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMedia {
    pub path: PathBuf,
    pub base_name: String,
    pub duration: f64,
}

/// Editing state for one source: cut timeline, derived segments and the runner.
///
/// Every mutating command fails with a validation error while a run is in
/// progress. Any timeline change drops the derived segments together with
/// their name and status overrides.
pub struct EditorSession {
    source: Option<SourceMedia>,
    timeline: CutTimeline,
    segments: Option<Vec<Segment>>,
    runner: JobRunner,
}

impl EditorSession {
    /// Create an empty session extracting through `extractor`
    pub fn new(extractor: Arc<dyn ExtractPort>) -> Self {
        Self {
            source: None,
            timeline: CutTimeline::new(),
            segments: None,
            runner: JobRunner::new(extractor),
        }
    }

    /// Open a source, discarding any previous timeline
    pub fn open_source(&mut self, path: impl Into<PathBuf>, duration: f64) -> SplitterResult<()> {
        self.ensure_idle()?;
        validate_duration(duration)?;

        let path = path.into();
        let base_name = file_stem(&path)?;
        info!("Opened {} ({:.3}s)", path.display(), duration);

        self.source = Some(SourceMedia {
            path,
            base_name,
            duration,
        });
        self.timeline.clear();
        self.invalidate();
        Ok(())
    }

    /// Replace the session with a loaded project against a source of `duration`
    pub fn restore(&mut self, project: &LoadedProject, duration: f64) -> SplitterResult<()> {
        self.ensure_idle()?;
        validate_duration(duration)?;

        self.source = Some(SourceMedia {
            path: project.state.source_path.clone(),
            base_name: project.state.source_base_name.clone(),
            duration,
        });
        self.timeline = project.timeline();
        self.invalidate();
        debug!("Restored project with {} cuts", self.timeline.len());
        Ok(())
    }

    pub fn source(&self) -> Option<&SourceMedia> {
        self.source.as_ref()
    }

    pub fn timeline(&self) -> &CutTimeline {
        &self.timeline
    }

    /// Segments from the last `generate_segments`, if still valid
    pub fn segments(&self) -> Option<&[Segment]> {
        self.segments.as_deref()
    }

    pub fn run_state(&self) -> RunState {
        self.runner.state()
    }

    /// Add a cut at the playhead
    pub fn add_cut(&mut self, playhead: f64) -> SplitterResult<usize> {
        let duration = self.editable_duration()?;
        let position = self.timeline.add(playhead, duration)?;
        self.invalidate();
        Ok(position)
    }

    pub fn remove_cut(&mut self, index: usize) -> SplitterResult<()> {
        self.ensure_idle()?;
        self.timeline.remove(index)?;
        self.invalidate();
        Ok(())
    }

    /// Flip the tag of the cut at `seconds`, or of the most recently added cut
    pub fn toggle_tag(&mut self, seconds: Option<f64>) -> SplitterResult<Tag> {
        self.ensure_idle()?;
        let tag = self.timeline.toggle_tag(seconds)?;
        self.invalidate();
        Ok(tag)
    }

    pub fn set_tag(&mut self, index: usize, tag: Tag) -> SplitterResult<()> {
        self.ensure_idle()?;
        self.timeline.set_tag(index, tag)?;
        self.invalidate();
        Ok(())
    }

    pub fn cut_first(&mut self, seconds: f64) -> SplitterResult<usize> {
        let duration = self.editable_duration()?;
        let position = self.timeline.cut_first(seconds, duration)?;
        self.invalidate();
        Ok(position)
    }

    pub fn cut_last(&mut self, seconds: f64) -> SplitterResult<usize> {
        let duration = self.editable_duration()?;
        let position = self.timeline.cut_last(seconds, duration)?;
        self.invalidate();
        Ok(position)
    }

    /// Replace the timeline with evenly spaced cuts
    pub fn split_by_interval(&mut self, interval: f64) -> SplitterResult<usize> {
        let duration = self.editable_duration()?;
        let count = self.timeline.split_by_interval(interval, duration)?;
        self.invalidate();
        Ok(count)
    }

    pub fn clear_cuts(&mut self) -> SplitterResult<()> {
        self.ensure_idle()?;
        self.timeline.clear();
        self.invalidate();
        Ok(())
    }

    /// Derive segments from the current timeline, replacing previous overrides
    pub fn generate_segments(&mut self) -> SplitterResult<&[Segment]> {
        let duration = self.editable_duration()?;
        let generated = segments::generate(&self.timeline, duration)?;
        debug!("Generated {} segments", generated.len());
        Ok(self.segments.insert(generated).as_slice())
    }

    pub fn rename_segment(&mut self, index: usize, name: &str) -> SplitterResult<()> {
        validate_segment_name(name)?;
        self.segment_mut(index)?.name = name.to_string();
        Ok(())
    }

    pub fn set_segment_status(&mut self, index: usize, status: Tag) -> SplitterResult<()> {
        self.segment_mut(index)?.status = status;
        Ok(())
    }

    /// Snapshot for persistence
    pub fn project_state(&self) -> SplitterResult<ProjectState> {
        let source = self.require_source()?;
        Ok(ProjectState {
            source_path: source.path.clone(),
            source_base_name: source.base_name.clone(),
            cuts: self.timeline.points().to_vec(),
        })
    }

    /// Extraction jobs for the generated segments
    pub fn build_jobs(
        &self,
        output_dir: &Path,
        extension: &str,
        only_kept: bool,
    ) -> SplitterResult<Vec<ExtractionJob>> {
        let source = self.require_source()?;
        let segments = self.segments.as_deref().ok_or_else(not_generated)?;
        let rules = NamingRules::new(&source.path, &source.base_name, output_dir, extension)
            .with_only_kept(only_kept);
        build_jobs(segments, &rules)
    }

    /// Start extracting `jobs` in the background
    pub fn start_run(&self, jobs: Vec<ExtractionJob>) -> SplitterResult<RunHandle> {
        self.runner.start(jobs)
    }

    fn ensure_idle(&self) -> SplitterResult<()> {
        if self.runner.is_running() {
            return Err(SplitterError::validation(
                "Cannot edit while a run is in progress",
            ));
        }
        Ok(())
    }

    fn require_source(&self) -> SplitterResult<&SourceMedia> {
        self.source
            .as_ref()
            .ok_or_else(|| SplitterError::validation("No source media is open"))
    }

    fn editable_duration(&self) -> SplitterResult<f64> {
        self.ensure_idle()?;
        Ok(self.require_source()?.duration)
    }

    fn segment_mut(&mut self, index: usize) -> SplitterResult<&mut Segment> {
        self.ensure_idle()?;
        let segments = self.segments.as_mut().ok_or_else(not_generated)?;
        let count = segments.len();
        segments.get_mut(index).ok_or_else(|| {
            SplitterError::validation(format!(
                "Segment index {} out of range ({} segments)",
                index, count
            ))
        })
    }

    fn invalidate(&mut self) {
        self.segments = None;
    }
}

fn not_generated() -> SplitterError {
    SplitterError::validation("Segments have not been generated")
}
