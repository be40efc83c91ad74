// Cut timeline - Ordered set of tagged cut points

use crate::domain::model::{quantize_millis, CutPoint, Tag};
use crate::error::{SplitterError, SplitterResult};

/// Smallest split interval that can still yield distinct cut positions
pub const MIN_SPLIT_INTERVAL: f64 = 0.001;

/// Ordered, tagged cut points over a media timeline.
///
/// Points are kept sorted by position. Two points never share the same
/// millisecond, which is the uniqueness tolerance for cut positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutTimeline {
    points: Vec<CutPoint>,
    next_sequence: u64,
}

impl CutTimeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from unordered points.
    ///
    /// Points are inserted in ascending `sequence` order, ties in the order
    /// given, so a saved timeline keeps its most recently added cut.
    /// Returns the timeline and the number of points dropped because they
    /// landed on a millisecond already taken by an earlier point.
    pub fn from_points(mut points: Vec<CutPoint>) -> (Self, usize) {
        points.sort_by_key(|point| point.sequence);

        let mut timeline = Self::new();
        let mut dropped = 0;

        for mut point in points {
            match timeline.search(point.millis()) {
                Ok(_) => dropped += 1,
                Err(position) => {
                    point.sequence = timeline.take_sequence();
                    timeline.points.insert(position, point);
                }
            }
        }

        (timeline, dropped)
    }

    /// Add a cut at `seconds`, tagged `Keep`. Returns its position in the timeline.
    pub fn add(&mut self, seconds: f64, total_duration: f64) -> SplitterResult<usize> {
        validate_duration(total_duration)?;

        if !seconds.is_finite() || seconds <= 0.0 || seconds >= total_duration {
            return Err(SplitterError::validation(format!(
                "Cut position {:.3}s must lie strictly between 0s and {:.3}s",
                seconds, total_duration
            )));
        }

        let millis = quantize_millis(seconds);
        if millis <= 0 || millis >= quantize_millis(total_duration) {
            return Err(SplitterError::validation(format!(
                "Cut position {:.3}s is within 1ms of the start or end of the media",
                seconds
            )));
        }

        match self.search(millis) {
            Ok(existing) => Err(SplitterError::validation(format!(
                "Cut position {:.3}s collides with existing cut at {:.3}s",
                seconds,
                self.points[existing].seconds()
            ))),
            Err(position) => {
                let mut point = CutPoint::from_millis(millis, Tag::Keep);
                point.sequence = self.take_sequence();
                self.points.insert(position, point);
                Ok(position)
            }
        }
    }

    /// Remove the cut at `index`
    pub fn remove(&mut self, index: usize) -> SplitterResult<CutPoint> {
        if index >= self.points.len() {
            return Err(self.index_error(index));
        }
        Ok(self.points.remove(index))
    }

    /// Flip the tag of the cut at `seconds`, or of the most recently added cut
    /// when no position is given. Returns the new tag.
    pub fn toggle_tag(&mut self, seconds: Option<f64>) -> SplitterResult<Tag> {
        if self.points.is_empty() {
            return Err(SplitterError::validation(
                "No cut points to tag. Add a cut point first",
            ));
        }

        let index = match seconds {
            Some(seconds) => self.find(seconds).ok_or_else(|| {
                SplitterError::validation(format!("No cut point at {:.3}s", seconds))
            })?,
            None => self.most_recent_index().ok_or_else(|| {
                SplitterError::validation("No cut points to tag. Add a cut point first")
            })?,
        };

        let point = &mut self.points[index];
        point.tag = point.tag.toggled();
        Ok(point.tag)
    }

    /// Set the tag of the cut at `index`
    pub fn set_tag(&mut self, index: usize, tag: Tag) -> SplitterResult<()> {
        let error = self.index_error(index);
        let point = self.points.get_mut(index).ok_or(error)?;
        point.tag = tag;
        Ok(())
    }

    /// Cut `seconds` after the start of the media
    pub fn cut_first(&mut self, seconds: f64, total_duration: f64) -> SplitterResult<usize> {
        validate_offset(seconds, total_duration)?;
        self.add(seconds, total_duration)
    }

    /// Cut `seconds` before the end of the media
    pub fn cut_last(&mut self, seconds: f64, total_duration: f64) -> SplitterResult<usize> {
        validate_offset(seconds, total_duration)?;
        self.add(total_duration - seconds, total_duration)
    }

    /// Replace every cut with evenly spaced `Keep` cuts. Returns the new cut count.
    pub fn split_by_interval(&mut self, interval: f64, total_duration: f64) -> SplitterResult<usize> {
        validate_duration(total_duration)?;

        if !interval.is_finite() || interval <= 0.0 || interval >= total_duration {
            return Err(SplitterError::validation(format!(
                "Split interval {:.3}s must be greater than 0s and less than {:.3}s",
                interval, total_duration
            )));
        }
        if interval < MIN_SPLIT_INTERVAL {
            return Err(SplitterError::validation(format!(
                "Split interval {}s is shorter than 1ms",
                interval
            )));
        }

        let end_millis = quantize_millis(total_duration);
        let mut points: Vec<CutPoint> = Vec::new();
        let mut step: u64 = 1;

        loop {
            // Multiply rather than accumulate so long media does not drift
            let seconds = interval * step as f64;
            if seconds >= total_duration {
                break;
            }
            let millis = quantize_millis(seconds);
            let distinct = points.last().map_or(true, |last| last.millis() != millis);
            if millis > 0 && millis < end_millis && distinct {
                points.push(CutPoint::from_millis(millis, Tag::Keep));
            }
            step += 1;
        }

        self.points.clear();
        for mut point in points {
            point.sequence = self.take_sequence();
            self.points.push(point);
        }

        Ok(self.points.len())
    }

    /// Remove every cut
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Index of the cut closest to `seconds`, if one lies within 1ms of it
    pub fn find(&self, seconds: f64) -> Option<usize> {
        if !seconds.is_finite() {
            return None;
        }

        // Cuts are at least 1ms apart, so only the two neighbours can match
        let target = seconds * 1000.0;
        let position = self
            .points
            .partition_point(|point| (point.millis() as f64) < target);

        [position.checked_sub(1), Some(position)]
            .into_iter()
            .flatten()
            .filter_map(|index| {
                let point = self.points.get(index)?;
                let distance = (point.millis() as f64 - target).abs();
                (distance < 1.0).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Index of the most recently added cut
    pub fn most_recent_index(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .max_by_key(|(_, point)| point.sequence)
            .map(|(index, _)| index)
    }

    pub fn points(&self) -> &[CutPoint] {
        &self.points
    }

    /// Cut positions in seconds, ascending
    pub fn timestamps(&self) -> Vec<f64> {
        self.points.iter().map(CutPoint::seconds).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn search(&self, millis: i64) -> Result<usize, usize> {
        self.points.binary_search_by_key(&millis, CutPoint::millis)
    }

    fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn index_error(&self, index: usize) -> SplitterError {
        SplitterError::validation(format!(
            "Cut index {} out of range (timeline has {} cuts)",
            index,
            self.points.len()
        ))
    }
}

/// Reject durations that cannot hold a cut
pub(crate) fn validate_duration(total_duration: f64) -> SplitterResult<()> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(SplitterError::validation(format!(
            "Media duration must be a positive number of seconds, got {}",
            total_duration
        )));
    }
    Ok(())
}

fn validate_offset(seconds: f64, total_duration: f64) -> SplitterResult<()> {
    validate_duration(total_duration)?;
    if !seconds.is_finite() || seconds <= 0.0 || seconds >= total_duration {
        return Err(SplitterError::validation(format!(
            "Please enter a valid duration: {:.3}s is not between 0s and {:.3}s",
            seconds, total_duration
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
