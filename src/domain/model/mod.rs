// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{SplitterError, SplitterResult};

/// Millisecond resolution used to compare cut positions
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Convert seconds to the nearest whole millisecond
pub fn quantize_millis(seconds: f64) -> i64 {
    (seconds * MILLIS_PER_SECOND).round() as i64
}

/// Convert whole milliseconds back to seconds
pub fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / MILLIS_PER_SECOND
}

/// Whether a segment is extracted as a keeper or marked for discarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    #[default]
    Keep,
    Discard,
}

impl Tag {
    /// Parse tag from string
    pub fn parse(tag_str: &str) -> SplitterResult<Self> {
        match tag_str.trim().to_lowercase().as_str() {
            "keep" => Ok(Tag::Keep),
            "discard" => Ok(Tag::Discard),
            other => Err(SplitterError::validation(format!(
                "Invalid tag: {}. Valid tags: keep, discard",
                other
            ))),
        }
    }

    /// The opposite tag
    pub fn toggled(self) -> Self {
        match self {
            Tag::Keep => Tag::Discard,
            Tag::Discard => Tag::Keep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Keep => "keep",
            Tag::Discard => "discard",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged position on the media timeline
#[derive(Debug, Clone)]
pub struct CutPoint {
    millis: i64,
    pub tag: Tag,
    /// Insertion order, used to find the most recently added point
    pub(crate) sequence: u64,
}

impl CutPoint {
    /// Create a cut point from seconds, rounded to the nearest millisecond
    pub fn new(seconds: f64, tag: Tag) -> Self {
        Self::from_millis(quantize_millis(seconds), tag)
    }

    /// Create a cut point from whole milliseconds
    pub fn from_millis(millis: i64, tag: Tag) -> Self {
        Self {
            millis,
            tag,
            sequence: 0,
        }
    }

    /// Position in seconds
    pub fn seconds(&self) -> f64 {
        millis_to_seconds(self.millis)
    }

    /// Position in whole milliseconds
    pub fn millis(&self) -> i64 {
        self.millis
    }
}

// Equality ignores insertion order
impl PartialEq for CutPoint {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis && self.tag == other.tag
    }
}

impl Eq for CutPoint {}

/// A derived time range between two adjacent boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub name: String,
    pub status: Tag,
}

impl Segment {
    /// Default name for the segment at a zero-based index
    pub fn default_name(index: usize) -> String {
        format!("segment_{}", index + 1)
    }

    /// Length of the segment in seconds
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// A single lossless extraction to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionJob {
    /// Index of the segment this job was built from
    pub index: usize,
    pub source_path: PathBuf,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub output_path: PathBuf,
}

/// Durable record of a source reference and its cuts
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectState {
    pub source_path: PathBuf,
    pub source_base_name: String,
    pub cuts: Vec<CutPoint>,
}

impl ProjectState {
    /// Create a project state with no cuts
    pub fn new(source_path: impl Into<PathBuf>, source_base_name: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            source_base_name: source_base_name.into(),
            cuts: Vec::new(),
        }
    }
}
