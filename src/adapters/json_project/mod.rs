// JSON project adapter - Durable project state in `.mp4proj` files

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::model::{quantize_millis, CutPoint, ProjectState, Tag};
use crate::domain::timeline::CutTimeline;
use crate::error::{SplitterError, SplitterResult};
use crate::ports::{LoadWarning, LoadedProject, ProjectPort};
use crate::utils::path::file_stem;

/// Default extension for project files
pub const PROJECT_EXTENSION: &str = "mp4proj";

/// On-disk layout of a project file
#[derive(Serialize)]
struct ProjectDocument<'a> {
    video_file: String,
    video_filename: &'a str,
    cuts: Vec<f64>,
    cut_status: BTreeMap<String, Tag>,
}

/// Project store backed by pretty-printed JSON files
#[derive(Debug, Default, Clone)]
pub struct JsonProjectStore;

impl JsonProjectStore {
    /// Create new JSON project store
    pub fn new() -> Self {
        Self
    }

    fn to_document(state: &ProjectState) -> ProjectDocument<'_> {
        // Written in insertion order; load sorts by position
        let mut ordered: Vec<&CutPoint> = state.cuts.iter().collect();
        ordered.sort_by_key(|cut| cut.sequence);
        let cuts: Vec<f64> = ordered.iter().map(|cut| cut.seconds()).collect();
        let cut_status = state
            .cuts
            .iter()
            .map(|cut| (timestamp_key(cut.seconds()), cut.tag))
            .collect();

        ProjectDocument {
            video_file: state.source_path.to_string_lossy().to_string(),
            video_filename: &state.source_base_name,
            cuts,
            cut_status,
        }
    }

    fn parse_document(path: &Path, content: &str) -> SplitterResult<LoadedProject> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            SplitterError::io(format!(
                "Failed to open project {}: {}",
                path.display(),
                e
            ))
        })?;
        let document = value.as_object().ok_or_else(|| {
            SplitterError::io(format!(
                "Failed to open project {}: expected a JSON object",
                path.display()
            ))
        })?;

        let video_file = document
            .get("video_file")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SplitterError::io(format!(
                    "Failed to open project {}: missing video_file",
                    path.display()
                ))
            })?;

        let source_path = resolve_source(path, video_file).ok_or_else(|| {
            SplitterError::validation(format!(
                "Video file not found: {}\n\nPlease move the project file near the video file.",
                video_file
            ))
        })?;

        let source_base_name = match document.get("video_filename").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => file_stem(&source_path)?,
        };

        let mut warnings = Vec::new();
        let statuses = parse_statuses(path, document, &mut warnings)?;
        let cuts = parse_cuts(path, document, &statuses, &mut warnings)?;

        let tagged: HashSet<i64> = cuts.iter().map(CutPoint::millis).collect();
        for (millis, key) in statuses.keys() {
            if !tagged.contains(millis) {
                warnings.push(LoadWarning::OrphanStatus { key: key.clone() });
            }
        }

        let (timeline, _) = CutTimeline::from_points(cuts);
        Ok(LoadedProject {
            state: ProjectState {
                source_path,
                source_base_name,
                cuts: timeline.points().to_vec(),
            },
            warnings,
        })
    }
}

impl ProjectPort for JsonProjectStore {
    fn save(&self, state: &ProjectState, path: &Path) -> SplitterResult<()> {
        let json = serde_json::to_string_pretty(&Self::to_document(state)).map_err(|e| {
            SplitterError::io(format!("Failed to encode project: {}", e))
        })?;

        fs::write(path, json).map_err(|e| {
            SplitterError::io(format!(
                "Failed to save project {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Project saved to {} ({} cuts)", path.display(), state.cuts.len());
        Ok(())
    }

    fn load(&self, path: &Path) -> SplitterResult<LoadedProject> {
        let content = fs::read_to_string(path).map_err(|e| {
            SplitterError::io(format!(
                "Failed to open project {}: {}",
                path.display(),
                e
            ))
        })?;

        let loaded = Self::parse_document(path, &content)?;
        for warning in &loaded.warnings {
            warn!("{}: {}", path.display(), warning);
        }
        info!(
            "Project loaded from {} ({} cuts)",
            path.display(),
            loaded.state.cuts.len()
        );
        Ok(loaded)
    }
}

/// Timestamp text used as a `cut_status` key, e.g. `5.0` or `12.345`
pub fn timestamp_key(seconds: f64) -> String {
    format!("{:?}", seconds)
}

/// Status tags keyed by quantized millisecond and the key text as written
fn parse_statuses(
    path: &Path,
    document: &Map<String, Value>,
    warnings: &mut Vec<LoadWarning>,
) -> SplitterResult<BTreeMap<(i64, String), Tag>> {
    let mut statuses = BTreeMap::new();
    let entries = match document.get("cut_status") {
        None | Some(Value::Null) => return Ok(statuses),
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            return Err(SplitterError::io(format!(
                "Failed to open project {}: cut_status must be an object",
                path.display()
            )))
        }
    };

    for (key, value) in entries {
        let seconds = match parse_seconds(key) {
            Some(seconds) => seconds,
            None => {
                warnings.push(LoadWarning::UnparsableStatusKey { raw: key.clone() });
                continue;
            }
        };

        let tag = match value.as_str().map(Tag::parse) {
            Some(Ok(tag)) => tag,
            _ => {
                warnings.push(LoadWarning::UnknownStatus {
                    key: key.clone(),
                    value: value.to_string(),
                });
                Tag::Keep
            }
        };

        statuses.insert((quantize_millis(seconds), key.clone()), tag);
    }

    Ok(statuses)
}

fn parse_cuts(
    path: &Path,
    document: &Map<String, Value>,
    statuses: &BTreeMap<(i64, String), Tag>,
    warnings: &mut Vec<LoadWarning>,
) -> SplitterResult<Vec<CutPoint>> {
    let entries = match document.get("cuts") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(SplitterError::io(format!(
                "Failed to open project {}: cuts must be a list",
                path.display()
            )))
        }
    };

    let tag_for = |millis: i64| {
        statuses
            .iter()
            .find(|((key_millis, _), _)| *key_millis == millis)
            .map_or(Tag::Keep, |(_, tag)| *tag)
    };

    let mut seen = HashSet::new();
    let mut cuts = Vec::with_capacity(entries.len());

    for entry in entries {
        let seconds = match entry {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_seconds(text),
            _ => None,
        };
        let Some(seconds) = seconds else {
            warnings.push(LoadWarning::UnparsableCut {
                raw: entry.to_string(),
            });
            continue;
        };

        let millis = quantize_millis(seconds);
        if millis <= 0 {
            warnings.push(LoadWarning::NonPositiveCut { seconds });
            continue;
        }
        if !seen.insert(millis) {
            warnings.push(LoadWarning::DuplicateCut { seconds });
            continue;
        }

        cuts.push(CutPoint::from_millis(millis, tag_for(millis)));
    }

    Ok(cuts)
}

fn parse_seconds(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|seconds| seconds.is_finite())
}

/// Find the source next to the project file first, then relative to the working directory
fn resolve_source(project_path: &Path, video_file: &str) -> Option<PathBuf> {
    let source = PathBuf::from(video_file);
    if source.is_absolute() {
        return source.exists().then_some(source);
    }

    let beside_project = project_path
        .parent()
        .map(|dir| dir.join(&source))
        .filter(|candidate| candidate.exists());

    beside_project.or_else(|| source.exists().then_some(source))
}
