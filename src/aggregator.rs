//! Lifestyle aggregation
//!
//! Rolling-window means over daily lifestyle logs. Logs are expected
//! newest-first (see [`sort_newest_first`]); the window takes the leading
//! entries. Missing numeric fields count as zero and stay in the denominator.

use crate::types::{Averages, LifestyleLog};

/// Default averaging window in days
pub const DEFAULT_WINDOW: usize = 7;

/// Compute per-field means over the first `window` logs.
///
/// Returns all-zero averages for an empty input or a zero window.
pub fn averages(logs: &[LifestyleLog], window: usize) -> Averages {
    let recent = &logs[..window.min(logs.len())];
    if recent.is_empty() {
        return Averages::default();
    }

    Averages {
        sleep: mean(recent, LifestyleLog::sleep),
        exercise: mean(recent, LifestyleLog::exercise),
        steps: mean(recent, LifestyleLog::steps),
        diet: mean(recent, LifestyleLog::diet),
        stress: mean(recent, LifestyleLog::stress),
        water: mean(recent, LifestyleLog::water),
        family_time: mean(recent, LifestyleLog::family_time),
        social_quality: mean(recent, LifestyleLog::social),
        spiritual_time: mean(recent, LifestyleLog::spiritual),
        mental_relaxation: mean(recent, LifestyleLog::mental_relaxation),
        days: recent.len(),
    }
}

/// Order logs by date, most recent first
pub fn sort_newest_first(logs: &mut [LifestyleLog]) {
    logs.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Arithmetic mean of one field over a non-empty slice
pub(crate) fn mean(logs: &[LifestyleLog], field: impl Fn(&LifestyleLog) -> f64) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let sum: f64 = logs.iter().map(field).sum();
    sum / logs.len() as f64
}
