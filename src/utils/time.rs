//! Time parsing and formatting utilities

use crate::error::{SplitterError, SplitterResult};

/// Parse a time string to seconds.
///
/// Accepted forms: plain seconds (`12.5`), `MM:SS(.ms)` and `HH:MM:SS(.ms)`.
pub fn parse_time(time_str: &str) -> SplitterResult<f64> {
    let time_str = time_str.trim();
    let invalid = || {
        SplitterError::validation(format!(
            "Invalid time format: '{}'. Use seconds, MM:SS(.ms) or HH:MM:SS(.ms)",
            time_str
        ))
    };

    let parts: Vec<&str> = time_str.split(':').collect();
    let seconds = match parts.as_slice() {
        [secs] => parse_component(secs).ok_or_else(invalid)?,
        [mins, secs] => {
            let minutes = parse_whole(mins).ok_or_else(invalid)?;
            let secs = parse_sub_minute(secs).ok_or_else(invalid)?;
            minutes * 60.0 + secs
        }
        [hours, mins, secs] => {
            let hours = parse_whole(hours).ok_or_else(invalid)?;
            let minutes = parse_whole(mins).filter(|m| *m < 60.0).ok_or_else(invalid)?;
            let secs = parse_sub_minute(secs).ok_or_else(invalid)?;
            hours * 3600.0 + minutes * 60.0 + secs
        }
        _ => return Err(invalid()),
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }
    Ok(seconds)
}

fn parse_component(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_whole(text: &str) -> Option<f64> {
    text.parse::<u64>().ok().map(|v| v as f64)
}

fn parse_sub_minute(text: &str) -> Option<f64> {
    parse_component(text).filter(|v| *v < 60.0)
}

/// Format seconds as `MM:SS.mmm`, or `HH:MM:SS.mmm` past the hour
pub fn format_clock(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}
