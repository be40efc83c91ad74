//! Map segments to extraction jobs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::model::{ExtractionJob, Segment, Tag};
use crate::error::{SplitterError, SplitterResult};
use crate::planner::{NamingRules, DISCARD_SUFFIX};

/// Build one extraction job per selected segment.
///
/// Every output path is resolved and checked for collisions before any job
/// is returned, so a renamed segment can never overwrite another's output.
pub fn build_jobs(segments: &[Segment], rules: &NamingRules) -> SplitterResult<Vec<ExtractionJob>> {
    ensure_output_dir(&rules.output_dir)?;

    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();
    let mut jobs = Vec::with_capacity(segments.len());

    for segment in segments {
        if rules.only_kept && segment.status == Tag::Discard {
            continue;
        }

        let output_path = rules.output_dir.join(output_file_name(segment, rules));

        if output_path == rules.source_path {
            return Err(SplitterError::validation(format!(
                "Segment {} would overwrite the source file {}",
                segment.index + 1,
                rules.source_path.display()
            )));
        }

        if let Some(previous) = claimed.insert(output_path.clone(), segment.index) {
            return Err(SplitterError::validation(format!(
                "Segments {} and {} both resolve to {}. Rename one of them",
                previous + 1,
                segment.index + 1,
                output_path.display()
            )));
        }

        debug!("Segment {} -> {}", segment.index, output_path.display());
        jobs.push(ExtractionJob {
            index: segment.index,
            source_path: rules.source_path.clone(),
            start_seconds: segment.start_seconds,
            end_seconds: segment.end_seconds,
            output_path,
        });
    }

    if jobs.is_empty() {
        return Err(SplitterError::validation("No segments selected for extraction"));
    }

    Ok(jobs)
}

/// `{base}_{name}[_discard].{ext}`
pub fn output_file_name(segment: &Segment, rules: &NamingRules) -> String {
    let suffix = match segment.status {
        Tag::Discard => DISCARD_SUFFIX,
        Tag::Keep => "",
    };
    format!(
        "{}_{}{}.{}",
        rules.base_name, segment.name, suffix, rules.extension
    )
}

/// The output directory must exist and accept new files
fn ensure_output_dir(dir: &Path) -> SplitterResult<()> {
    if !dir.is_dir() {
        return Err(SplitterError::validation(format!(
            "Output directory does not exist: {}",
            dir.display()
        )));
    }

    tempfile::tempfile_in(dir).map_err(|e| {
        SplitterError::io(format!(
            "Output directory is not writable: {}: {}",
            dir.display(),
            e
        ))
    })?;

    Ok(())
}
