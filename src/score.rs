//! Health score calculation
//!
//! Three independent additive scores, each clamped to 0-100:
//! - stability: alert-oriented, from rolling averages
//! - improvement: insight-card oriented, from the single latest log, with a
//!   factor breakdown and a sleep-based trend
//! - lifestyle: dashboard score from rolling averages including the
//!   social, spiritual, family and relaxation metrics

use crate::types::{
    Averages, FactorImpact, HealthFactor, ImprovementScore, LifestyleLog, Trend,
};

/// Improvement score shown before any log exists
pub const DEFAULT_IMPROVEMENT_SCORE: u32 = 75;

/// Sleep change (hours) needed to report an up/down trend
const TREND_SLEEP_DELTA: f64 = 0.5;

/// Value assumed for a missing stress or social rating in the latest log
const NEUTRAL_RATING: f64 = 5.0;

/// Alert-oriented stability score from rolling averages
pub fn stability_score(avg: &Averages) -> f64 {
    let mut score = 50.0;

    score += if (7.0..=9.0).contains(&avg.sleep) {
        15.0
    } else if avg.sleep >= 6.0 {
        10.0
    } else {
        5.0
    };

    score += if avg.exercise >= 30.0 {
        15.0
    } else if avg.exercise >= 15.0 {
        10.0
    } else {
        3.0
    };

    score += if avg.steps >= 10000.0 {
        10.0
    } else if avg.steps >= 5000.0 {
        6.0
    } else {
        2.0
    };

    score += (avg.diet / 10.0) * 10.0;
    score += ((10.0 - avg.stress) / 10.0) * 10.0;

    let score = score.clamp(0.0, 100.0);
    tracing::debug!(score, "computed stability score");
    score
}

/// Insight-card score from newest-first logs.
///
/// Only the latest log is scored. The second log, when present, provides the
/// previous score and the trend. The trend compares sleep hours only.
pub fn improvement_score(logs: &[LifestyleLog]) -> ImprovementScore {
    let Some(latest) = logs.first() else {
        return ImprovementScore {
            score: DEFAULT_IMPROVEMENT_SCORE,
            previous_score: None,
            trend: Trend::Stable,
            factors: Vec::new(),
        };
    };

    let (score, factors) = score_single_log(latest);
    let previous = logs.get(1);

    let trend = match previous {
        Some(prev) if latest.sleep() > prev.sleep() + TREND_SLEEP_DELTA => Trend::Up,
        Some(prev) if latest.sleep() < prev.sleep() - TREND_SLEEP_DELTA => Trend::Down,
        _ => Trend::Stable,
    };

    ImprovementScore {
        score,
        previous_score: previous.map(|prev| score_single_log(prev).0),
        trend,
        factors,
    }
}

/// Score one log and collect the non-zero factors
fn score_single_log(log: &LifestyleLog) -> (u32, Vec<HealthFactor>) {
    let mut score = 50.0;
    let mut factors = Vec::new();

    let sleep = (log.sleep() / 8.0 * 15.0).min(15.0);
    score += sleep;
    push_factor(&mut factors, "Sleep Quality", sleep, tiered_impact(sleep, 12.0, 7.0));

    let exercise = (log.exercise() / 30.0 * 12.0).min(12.0);
    score += exercise;
    push_factor(
        &mut factors,
        "Physical Activity",
        exercise,
        tiered_impact(exercise, 8.0, 4.0),
    );

    let stress = log.stress_level.unwrap_or(NEUTRAL_RATING);
    let stress_penalty = ((stress - 5.0) * 1.6).clamp(0.0, 8.0);
    score -= stress_penalty;
    if stress_penalty > 0.0 {
        factors.push(HealthFactor {
            name: "Stress Impact".to_string(),
            impact: FactorImpact::Negative,
            value: -(stress_penalty.round() as i32),
        });
    }

    let hydration = (log.water() / 8.0 * 5.0).min(5.0);
    score += hydration;
    push_factor(&mut factors, "Hydration", hydration, tiered_impact(hydration, 4.0, 2.0));

    // An unrated (or zero) social quality counts as neutral
    let social_rating = match log.social_quality {
        Some(rating) if rating > 0.0 => rating,
        _ => NEUTRAL_RATING,
    };
    let social = (social_rating / 10.0 * 6.0).min(6.0);
    score += social;
    push_factor(&mut factors, "Social Well-being", social, tiered_impact(social, 4.0, 2.0));

    let spiritual = minutes_tier(log.spiritual(), 20.0, 10.0, [5.0, 3.0, 1.0]);
    let family = minutes_tier(log.family_time(), 60.0, 30.0, [5.0, 3.0, 1.0]);
    score += spiritual + family;
    let holistic = spiritual + family;
    if holistic > 0.0 {
        let impact = if holistic >= 6.0 {
            FactorImpact::Positive
        } else {
            FactorImpact::Neutral
        };
        push_factor(&mut factors, "Holistic Wellness", holistic, impact);
    }

    (score.clamp(0.0, 100.0).round() as u32, factors)
}

fn push_factor(factors: &mut Vec<HealthFactor>, name: &str, points: f64, impact: FactorImpact) {
    if points > 0.0 {
        factors.push(HealthFactor {
            name: name.to_string(),
            impact,
            value: points.round() as i32,
        });
    }
}

fn tiered_impact(points: f64, positive_at: f64, neutral_at: f64) -> FactorImpact {
    if points >= positive_at {
        FactorImpact::Positive
    } else if points >= neutral_at {
        FactorImpact::Neutral
    } else {
        FactorImpact::Negative
    }
}

/// Points for a minutes value: top tier, middle tier, any-positive tier
fn minutes_tier(minutes: f64, high: f64, mid: f64, points: [f64; 3]) -> f64 {
    if minutes >= high {
        points[0]
    } else if minutes >= mid {
        points[1]
    } else if minutes > 0.0 {
        points[2]
    } else {
        0.0
    }
}

/// Dashboard score from rolling averages; `None` until a log exists
pub fn lifestyle_score(avg: &Averages) -> Option<f64> {
    if avg.days == 0 {
        return None;
    }

    let mut score = 40.0;

    score += if (7.0..=9.0).contains(&avg.sleep) {
        12.0
    } else if avg.sleep >= 6.0 {
        8.0
    } else {
        3.0
    };

    score += if avg.exercise >= 30.0 {
        12.0
    } else if avg.exercise >= 15.0 {
        8.0
    } else {
        2.0
    };

    score += if avg.steps >= 10000.0 {
        10.0
    } else if avg.steps >= 5000.0 {
        6.0
    } else {
        2.0
    };

    score += (avg.diet / 10.0) * 10.0;
    score += ((10.0 - avg.stress) / 10.0) * 10.0;
    score += (avg.social_quality / 10.0) * 8.0;
    score += minutes_tier(avg.spiritual_time, 20.0, 10.0, [6.0, 4.0, 2.0]);
    score += minutes_tier(avg.family_time, 60.0, 30.0, [7.0, 5.0, 2.0]);
    score += minutes_tier(avg.mental_relaxation, 15.0, 5.0, [5.0, 3.0, 1.0]);

    Some(score.clamp(0.0, 100.0))
}
