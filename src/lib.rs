//! Lossless Splitter Library
//!
//! Mark cut points on a media file, derive the segments between them, tag each
//! segment keep or discard, and extract the segments with a stream copy.
//!
//! # Usage
//!
//! ```bash
//! splitter new --source holiday.mp4 --project holiday.mp4proj
//! splitter cut --project holiday.mp4proj --at 00:01:30
//! splitter run --project holiday.mp4proj --out clips/
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{EditorSession, SourceMedia};
pub use domain::model::{CutPoint, ExtractionJob, ProjectState, Segment, Tag};
pub use domain::timeline::CutTimeline;
pub use engine::{CancelToken, JobRunner, RunEvent, RunHandle, RunOutcome, RunState};
pub use error::{SplitterError, SplitterResult};
