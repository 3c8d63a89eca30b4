//! Predictive warnings
//!
//! Scans symptom history for recurring symptoms and turns each recurrence into
//! a probability estimate of it returning soon.

use crate::symptoms::display_name;
use crate::types::{PredictiveWarning, SymptomCheck, WarningLevel};

/// History length required before any warning is produced
pub const MIN_HISTORY: usize = 3;

/// Maximum warnings returned
pub const MAX_WARNINGS: usize = 3;

const MIN_OCCURRENCES: usize = 2;
const BASE_PROBABILITY: u32 = 40;
const PROBABILITY_PER_OCCURRENCE: u32 = 10;
const MAX_PROBABILITY: u32 = 85;
const MIN_REPORTED_PROBABILITY: u32 = 50;

/// Derive predictive warnings from newest-first symptom history.
///
/// Symptoms are counted across the whole history. Ties keep first-occurrence
/// order while scanning newest-first.
pub fn predictive_warnings(history: &[SymptomCheck]) -> Vec<PredictiveWarning> {
    if history.len() < MIN_HISTORY {
        return Vec::new();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for check in history {
        for symptom in &check.symptoms {
            match counts.iter_mut().find(|(s, _)| *s == symptom.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((symptom.as_str(), 1)),
            }
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= MIN_OCCURRENCES)
        .filter_map(|(symptom, count)| {
            let probability = recurrence_probability(count);
            (probability > MIN_REPORTED_PROBABILITY).then(|| PredictiveWarning {
                id: format!("recurring-{}", symptom),
                symptom: display_name(symptom),
                risk_level: warning_level(probability),
                probability,
                based_on: vec![
                    format!("Occurred {} times recently", count),
                    "Historical pattern detected".to_string(),
                ],
                preventive_actions: vec![
                    "Monitor triggers and patterns".to_string(),
                    "Consider lifestyle adjustments".to_string(),
                    "Track symptom frequency".to_string(),
                ],
                timeframe: "Next 7 days".to_string(),
            })
        })
        .take(MAX_WARNINGS)
        .collect()
}

/// `min(85, 40 + 10 * count)`
pub fn recurrence_probability(count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    BASE_PROBABILITY
        .saturating_add(count.saturating_mul(PROBABILITY_PER_OCCURRENCE))
        .min(MAX_PROBABILITY)
}

/// Strictly above 70 is high, strictly above 55 is elevated
pub fn warning_level(probability: u32) -> WarningLevel {
    if probability > 70 {
        WarningLevel::High
    } else if probability > 55 {
        WarningLevel::Elevated
    } else {
        WarningLevel::Moderate
    }
}
