//! Symptom risk model
//!
//! Maps a set of selected symptoms to a normalized risk score and a discrete
//! level. The score is the larger of:
//! - the summed severity weights, normalized so two mid-severity symptoms
//!   saturate moderate concern (`sum / 2`, capped at 1)
//! - the strongest partially matched co-occurrence cluster
//!   (`severity * matched / cluster_size`, needs at least two matches)
//!
//! The computation is pure and deterministic. The level it produces is the only
//! level ever shown to the user; remote narrative services cannot override it.

use super::catalog::{weight_of, SYMPTOM_CLUSTERS};
use crate::types::{RiskAssessment, RiskLevel};
use std::collections::HashSet;

/// Normalization constant for the weighted sum
const WEIGHT_NORMALIZER: f64 = 2.0;

/// Minimum cluster members present before a pattern counts
const MIN_CLUSTER_MATCH: usize = 2;

/// Score a symptom set.
///
/// Duplicate IDs are counted once. Unknown IDs use the default weight.
/// An empty set scores 0 / low; callers should reject empty input before
/// requesting an analysis.
pub fn compute_risk<S: AsRef<str>>(symptoms: &[S]) -> RiskAssessment {
    let mut seen = HashSet::new();
    let selected: Vec<&str> = symptoms
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| seen.insert(*s))
        .collect();

    if selected.is_empty() {
        return RiskAssessment {
            score: 0.0,
            level: RiskLevel::Low,
            matched_patterns: Vec::new(),
        };
    }

    let total_weight: f64 = selected.iter().map(|s| weight_of(s)).sum();
    let mut score = (total_weight / WEIGHT_NORMALIZER).min(1.0);

    let mut matched_patterns = Vec::new();
    for cluster in SYMPTOM_CLUSTERS {
        let match_count = cluster
            .symptoms
            .iter()
            .filter(|member| seen.contains(*member))
            .count();

        if match_count >= MIN_CLUSTER_MATCH {
            let candidate = cluster.severity * (match_count as f64 / cluster.symptoms.len() as f64);
            score = score.max(candidate);
            matched_patterns.push(cluster.label.to_string());
        }
    }

    let level = RiskLevel::from_score(score);
    tracing::debug!(
        symptoms = selected.len(),
        score,
        level = level.as_str(),
        "computed symptom risk"
    );

    RiskAssessment {
        score,
        level,
        matched_patterns,
    }
}
