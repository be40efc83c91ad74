//! Extraction job planning module

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod jobs;

pub use jobs::build_jobs;

/// Suffix appended to the file name of discarded segments
pub const DISCARD_SUFFIX: &str = "_discard";

/// Naming rules for the output files of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingRules {
    /// Source media file every job reads from
    pub source_path: PathBuf,
    /// Prefix for every output file name
    pub base_name: String,
    /// Directory that receives the output files
    pub output_dir: PathBuf,
    /// Output extension without the leading dot
    pub extension: String,
    /// Skip segments tagged `Discard`
    pub only_kept: bool,
}

impl NamingRules {
    /// Create naming rules that extract every segment
    pub fn new(
        source_path: impl Into<PathBuf>,
        base_name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            base_name: base_name.into(),
            output_dir: output_dir.into(),
            extension: extension.into(),
            only_kept: false,
        }
    }

    /// Restrict the run to segments tagged `Keep`
    pub fn with_only_kept(mut self, only_kept: bool) -> Self {
        self.only_kept = only_kept;
        self
    }
}
