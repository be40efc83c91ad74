// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::{ExtractionJob, ProjectState};
use crate::domain::timeline::CutTimeline;
use crate::error::SplitterResult;

/// Port for the external lossless extraction tool
#[async_trait]
pub trait ExtractPort: Send + Sync {
    /// Stream-copy `[start, end)` of the job's source into its output path.
    ///
    /// Returns once the tool has exited. A non-zero exit or a launch failure
    /// is an `Execution` error carrying the tool's diagnostics.
    async fn extract(&self, job: &ExtractionJob) -> SplitterResult<()>;
}

/// Port for reading media metadata
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of the media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> SplitterResult<f64>;
}

/// Port for durable project state
pub trait ProjectPort: Send + Sync {
    /// Write the project state to `path`
    fn save(&self, state: &ProjectState, path: &Path) -> SplitterResult<()>;

    /// Read project state from `path`, recovering from malformed cut entries
    fn load(&self, path: &Path) -> SplitterResult<LoadedProject>;
}

/// A project read from disk together with everything skipped while reading it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub state: ProjectState,
    pub warnings: Vec<LoadWarning>,
}

impl LoadedProject {
    /// Sorted timeline built from the loaded cuts
    pub fn timeline(&self) -> CutTimeline {
        CutTimeline::from_points(self.state.cuts.clone()).0
    }
}

/// An entry of the project file that was skipped or repaired during load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// A `cuts` entry that is not a number
    UnparsableCut { raw: String },
    /// A `cuts` entry at or before the start of the media
    NonPositiveCut { seconds: f64 },
    /// A `cuts` entry on the same millisecond as an earlier one
    DuplicateCut { seconds: f64 },
    /// A `cut_status` key that is not a number
    UnparsableStatusKey { raw: String },
    /// A `cut_status` value other than keep or discard
    UnknownStatus { key: String, value: String },
    /// A `cut_status` key with no matching cut
    OrphanStatus { key: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnparsableCut { raw } => {
                write!(f, "Skipped cut entry that is not a number: {}", raw)
            }
            LoadWarning::NonPositiveCut { seconds } => {
                write!(f, "Skipped cut at {}s: cuts must be after the start", seconds)
            }
            LoadWarning::DuplicateCut { seconds } => {
                write!(f, "Skipped duplicate cut at {}s", seconds)
            }
            LoadWarning::UnparsableStatusKey { raw } => {
                write!(f, "Skipped status for timestamp that is not a number: {}", raw)
            }
            LoadWarning::UnknownStatus { key, value } => {
                write!(f, "Unknown status '{}' for cut {}, using keep", value, key)
            }
            LoadWarning::OrphanStatus { key } => {
                write!(f, "Ignored status for {}: no cut at that timestamp", key)
            }
        }
    }
}
