// Segment generation - Derive contiguous segments from a cut timeline

use crate::domain::model::{Segment, Tag};
use crate::domain::timeline::{validate_duration, CutTimeline};
use crate::error::{SplitterError, SplitterResult};

/// Derive the segments between `0`, every cut, and `total_duration`.
///
/// A segment takes the tag of the cut that closes it. The last segment has no
/// closing cut and is always `Keep`.
pub fn generate(timeline: &CutTimeline, total_duration: f64) -> SplitterResult<Vec<Segment>> {
    if timeline.is_empty() {
        return Err(SplitterError::validation(
            "Please add at least one cut point before generating segments",
        ));
    }
    validate_duration(total_duration)?;

    let points = timeline.points();
    if let Some(last) = points.last() {
        if last.seconds() >= total_duration {
            return Err(SplitterError::validation(format!(
                "Cut at {:.3}s lies beyond the media duration of {:.3}s",
                last.seconds(),
                total_duration
            )));
        }
    }

    let mut boundaries = Vec::with_capacity(points.len() + 2);
    boundaries.push(0.0);
    boundaries.extend(points.iter().map(|point| point.seconds()));
    boundaries.push(total_duration);

    let segments = boundaries
        .windows(2)
        .enumerate()
        .map(|(index, bounds)| Segment {
            index,
            start_seconds: bounds[0],
            end_seconds: bounds[1],
            name: Segment::default_name(index),
            status: points.get(index).map_or(Tag::Keep, |closing| closing.tag),
        })
        .collect();

    Ok(segments)
}
