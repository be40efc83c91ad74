//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

/// Percentage of finished units, 0 when there is no work
pub fn percent_complete(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 * 100.0 / total as f64
    }
}
