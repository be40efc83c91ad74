//! Path helpers for source, project and output files

use std::path::Path;

use crate::error::{SplitterError, SplitterResult};

/// File name without extension, used as the base of output names
pub fn file_stem(path: &Path) -> SplitterResult<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            SplitterError::validation(format!("Path has no file name: {}", path.display()))
        })
}

/// Check a user-chosen segment name can be used as part of a file name
pub fn validate_segment_name(name: &str) -> SplitterResult<()> {
    if name.trim().is_empty() {
        return Err(SplitterError::validation("Segment name cannot be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SplitterError::validation(format!(
            "Segment name '{}' must not contain path separators",
            name
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(SplitterError::validation(format!(
            "Segment name '{}' contains control characters",
            name.escape_debug()
        )));
    }
    Ok(())
}
