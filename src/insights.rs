//! Insight generation
//!
//! Derives the personalized insight feed from newest-first logs and symptom
//! history. Three independent sources contribute:
//! - period comparison: the latest 7 logs against the 7 before them
//! - static thresholds on the latest 7-day averages
//! - a stress/symptom correlation check against the latest symptom checks
//!
//! The feed is sorted by priority; insertion order is kept within a priority.

use crate::aggregator::{mean, DEFAULT_WINDOW};
use crate::types::{
    HealthInsight, InsightCategory, InsightMetric, InsightPriority, InsightType, LifestyleLog,
    SymptomCheck,
};
use chrono::{DateTime, Utc};

/// Percent change in average sleep needed to report it
const SLEEP_CHANGE_THRESHOLD: f64 = 10.0;

/// Percent change in average steps needed to report it
const STEPS_CHANGE_THRESHOLD: f64 = 15.0;

/// Symptom checks inspected for the stress correlation
const CORRELATION_CHECKS: usize = 3;

/// Symptoms commonly driven by stress
const STRESS_SYMPTOMS: &[&str] = &["headache", "insomnia", "anxiety"];

/// Generate the insight feed.
///
/// `logs` and `history` must be ordered newest-first. Returns an empty feed
/// when there are no logs.
pub fn generate_insights(
    logs: &[LifestyleLog],
    history: &[SymptomCheck],
    now: DateTime<Utc>,
) -> Vec<HealthInsight> {
    let mut insights = Vec::new();
    if logs.is_empty() {
        return insights;
    }

    let recent = &logs[..DEFAULT_WINDOW.min(logs.len())];
    let prior_end = (DEFAULT_WINDOW * 2).min(logs.len());
    let prior = &logs[recent.len()..prior_end];

    let avg_sleep = mean(recent, LifestyleLog::sleep);
    let avg_steps = mean(recent, LifestyleLog::steps);
    let avg_stress = mean(recent, LifestyleLog::stress);
    let avg_exercise = mean(recent, LifestyleLog::exercise);
    let avg_water = mean(recent, LifestyleLog::water);

    if !prior.is_empty() {
        let prior_sleep = mean(prior, LifestyleLog::sleep);
        if let Some(change) = percent_change(avg_sleep, prior_sleep) {
            if change.abs() > SLEEP_CHANGE_THRESHOLD {
                let up = change > 0.0;
                insights.push(HealthInsight {
                    id: "sleep-change".to_string(),
                    insight_type: if up { InsightType::Improvement } else { InsightType::Warning },
                    category: InsightCategory::Sleep,
                    title: if up { "Sleep Improvement" } else { "Sleep Decline" }.to_string(),
                    message: format!(
                        "Your sleep {} by {:.0}% this week compared to last week.",
                        if up { "increased" } else { "dropped" },
                        change.abs()
                    ),
                    metric: Some(InsightMetric {
                        value: round_to(avg_sleep, 1),
                        change: round_to(avg_sleep - prior_sleep, 1),
                        unit: "hrs".to_string(),
                    }),
                    priority: change_priority(change, SLEEP_CHANGE_THRESHOLD),
                    timestamp: now,
                });
            }
        }

        let prior_steps = mean(prior, LifestyleLog::steps);
        if let Some(change) = percent_change(avg_steps, prior_steps) {
            if change.abs() > STEPS_CHANGE_THRESHOLD {
                let up = change > 0.0;
                insights.push(HealthInsight {
                    id: "activity-change".to_string(),
                    insight_type: if up { InsightType::Improvement } else { InsightType::Warning },
                    category: InsightCategory::Activity,
                    title: if up { "Activity Boost" } else { "Activity Drop" }.to_string(),
                    message: format!(
                        "Your daily steps {} by {:.0}% compared to the previous week.",
                        if up { "increased" } else { "decreased" },
                        change.abs()
                    ),
                    metric: Some(InsightMetric {
                        value: avg_steps.round(),
                        change: (avg_steps - prior_steps).round(),
                        unit: "steps".to_string(),
                    }),
                    priority: change_priority(change, STEPS_CHANGE_THRESHOLD),
                    timestamp: now,
                });
            }
        }
    }

    if avg_sleep < 6.0 {
        insights.push(HealthInsight {
            id: "low-sleep".to_string(),
            insight_type: InsightType::Warning,
            category: InsightCategory::Sleep,
            title: "Insufficient Sleep".to_string(),
            message: "Your average sleep is below the recommended 7-9 hours. This may affect \
                      your immune system and mental clarity."
                .to_string(),
            metric: None,
            priority: if avg_sleep < 5.0 {
                InsightPriority::High
            } else {
                InsightPriority::Medium
            },
            timestamp: now,
        });
    }

    if avg_stress > 7.0 {
        insights.push(HealthInsight {
            id: "high-stress".to_string(),
            insight_type: InsightType::Warning,
            category: InsightCategory::Stress,
            title: "Elevated Stress Levels".to_string(),
            message: "Your stress levels have been consistently high. Consider relaxation \
                      techniques or speaking with a professional."
                .to_string(),
            metric: None,
            priority: if avg_stress > 8.0 {
                InsightPriority::High
            } else {
                InsightPriority::Medium
            },
            timestamp: now,
        });
    }

    if avg_water < 6.0 {
        insights.push(HealthInsight {
            id: "low-hydration".to_string(),
            insight_type: InsightType::Suggestion,
            category: InsightCategory::Hydration,
            title: "Increase Hydration".to_string(),
            message: "You're averaging less than 6 glasses of water daily. Aim for 8+ glasses \
                      for optimal health."
                .to_string(),
            metric: None,
            priority: InsightPriority::Low,
            timestamp: now,
        });
    }

    if avg_exercise >= 30.0 {
        insights.push(HealthInsight {
            id: "exercise-goal".to_string(),
            insight_type: InsightType::Achievement,
            category: InsightCategory::Activity,
            title: "Exercise Goal Met".to_string(),
            message: "Great job! You're averaging 30+ minutes of exercise daily, meeting WHO \
                      recommendations."
                .to_string(),
            metric: None,
            priority: InsightPriority::Low,
            timestamp: now,
        });
    }

    if avg_stress > 6.0 && has_recent_stress_symptoms(history) {
        insights.push(HealthInsight {
            id: "stress-symptom-correlation".to_string(),
            insight_type: InsightType::Suggestion,
            category: InsightCategory::Stress,
            title: "Stress-Symptom Correlation".to_string(),
            message: "Your recent symptoms may be linked to elevated stress levels. Consider \
                      stress management techniques."
                .to_string(),
            metric: None,
            priority: InsightPriority::Medium,
            timestamp: now,
        });
    }

    // sort_by_key is stable
    insights.sort_by_key(|insight| insight.priority.rank());
    insights
}

/// Percent change from `prior` to `recent`; `None` when `prior` is zero
fn percent_change(recent: f64, prior: f64) -> Option<f64> {
    if prior == 0.0 {
        return None;
    }
    Some((recent - prior) * 100.0 / prior)
}

fn change_priority(change: f64, threshold: f64) -> InsightPriority {
    if change.abs() > threshold * 2.0 {
        InsightPriority::High
    } else {
        InsightPriority::Medium
    }
}

fn has_recent_stress_symptoms(history: &[SymptomCheck]) -> bool {
    history
        .iter()
        .take(CORRELATION_CHECKS)
        .any(|check| STRESS_SYMPTOMS.iter().any(|s| check.contains(s)))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn make_log(days_ago: i64, sleep: f64, steps: u32) -> LifestyleLog {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap() - Duration::days(days_ago);
        let mut log = LifestyleLog::new(date);
        log.sleep_hours = Some(sleep);
        log.daily_steps = Some(steps);
        log.stress_level = Some(4.0);
        log.water_glasses = Some(8.0);
        log.exercise_minutes = Some(20.0);
        log
    }

    /// Newest-first: `recent` for days 0-6, `prior` for days 7-13
    fn two_weeks(recent: (f64, u32), prior: (f64, u32)) -> Vec<LifestyleLog> {
        (0..14)
            .map(|d| {
                let (sleep, steps) = if d < 7 { recent } else { prior };
                make_log(d, sleep, steps)
            })
            .collect()
    }

    fn make_check(symptoms: &[&str]) -> SymptomCheck {
        SymptomCheck {
            id: Uuid::new_v4(),
            checked_at: Utc::now(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            risk_level: RiskLevel::Low,
            risk_score: 20,
            analysis: String::new(),
            recommendations: Vec::new(),
        }
    }

    fn ids(insights: &[HealthInsight]) -> Vec<&str> {
        insights.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_no_logs_no_insights() {
        assert!(generate_insights(&[], &[make_check(&["headache"])], Utc::now()).is_empty());
    }

    #[test]
    fn test_steady_week_has_no_change_insights() {
        let logs = two_weeks((7.5, 8000), (7.5, 8000));
        assert!(generate_insights(&logs, &[], Utc::now()).is_empty());
    }

    #[test]
    fn test_sleep_improvement_medium() {
        // +15.7%: above 10, below 20
        let logs = two_weeks((8.1, 8000), (7.0, 8000));
        let insights = generate_insights(&logs, &[], Utc::now());

        assert_eq!(ids(&insights), vec!["sleep-change"]);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::Improvement);
        assert_eq!(insight.priority, InsightPriority::Medium);
        let metric = insight.metric.as_ref().unwrap();
        assert!((metric.value - 8.1).abs() < 1e-9);
        assert!((metric.change - 1.1).abs() < 1e-9);
        assert_eq!(metric.unit, "hrs");
    }

    #[test]
    fn test_sleep_decline_high_priority() {
        // -25%
        let logs = two_weeks((6.0, 8000), (8.0, 8000));
        let insights = generate_insights(&logs, &[], Utc::now());

        let sleep = insights.iter().find(|i| i.id == "sleep-change").unwrap();
        assert_eq!(sleep.insight_type, InsightType::Warning);
        assert_eq!(sleep.title, "Sleep Decline");
        assert_eq!(sleep.priority, InsightPriority::High);
        assert!(sleep.message.contains("dropped by 25%"));
    }

    #[test]
    fn test_zero_prior_sleep_skipped() {
        let logs = two_weeks((7.5, 8000), (0.0, 8000));
        let insights = generate_insights(&logs, &[], Utc::now());
        assert!(!ids(&insights).contains(&"sleep-change"));
    }

    #[test]
    fn test_steps_change_and_zero_guard() {
        let logs = two_weeks((7.5, 12000), (7.5, 6000));
        let insights = generate_insights(&logs, &[], Utc::now());
        let activity = insights.iter().find(|i| i.id == "activity-change").unwrap();
        assert_eq!(activity.title, "Activity Boost");
        assert_eq!(activity.priority, InsightPriority::High);
        assert_eq!(activity.metric.as_ref().unwrap().change, 6000.0);

        let logs = two_weeks((7.5, 12000), (7.5, 0));
        let insights = generate_insights(&logs, &[], Utc::now());
        assert!(!ids(&insights).contains(&"activity-change"));
    }

    fn priority_of(insights: &[HealthInsight], id: &str) -> Option<InsightPriority> {
        insights.iter().find(|i| i.id == id).map(|i| i.priority)
    }

    #[test]
    fn test_period_change_boundaries() {
        let sleep_cases = [
            (5.5, 5.0, None),                          // exactly +10%
            (4.5, 5.0, None),                          // exactly -10%
            (6.0, 5.0, Some(InsightPriority::Medium)), // exactly +20%
            (6.5, 5.0, Some(InsightPriority::High)),   // +30%
        ];
        for (recent, prior, expected) in sleep_cases {
            let logs = two_weeks((recent, 8000), (prior, 8000));
            let insights = generate_insights(&logs, &[], Utc::now());
            assert_eq!(
                priority_of(&insights, "sleep-change"),
                expected,
                "sleep {} vs {}",
                recent,
                prior
            );
        }

        let steps_cases = [
            (9200, 8000, None),                            // exactly +15%
            (6800, 8000, None),                            // exactly -15%
            (10400, 8000, Some(InsightPriority::Medium)),  // exactly +30%
            (10480, 8000, Some(InsightPriority::High)),    // +31%
        ];
        for (recent, prior, expected) in steps_cases {
            let logs = two_weeks((7.5, recent), (7.5, prior));
            let insights = generate_insights(&logs, &[], Utc::now());
            assert_eq!(
                priority_of(&insights, "activity-change"),
                expected,
                "steps {} vs {}",
                recent,
                prior
            );
        }
    }

    fn week_with(sleep: f64, stress: f64, water: f64, exercise: f64) -> Vec<LifestyleLog> {
        (0..7)
            .map(|d| {
                let mut log = make_log(d, sleep, 8000);
                log.stress_level = Some(stress);
                log.water_glasses = Some(water);
                log.exercise_minutes = Some(exercise);
                log
            })
            .collect()
    }

    #[test]
    fn test_static_threshold_boundaries() {
        // Exactly on every cutoff: sleep 6, stress 7, water 6 emit nothing; exercise 30 counts
        let insights = generate_insights(&week_with(6.0, 7.0, 6.0, 30.0), &[], Utc::now());
        assert_eq!(ids(&insights), vec!["exercise-goal"]);

        // Sleep 5 and stress 8 stay medium
        let insights = generate_insights(&week_with(5.0, 8.0, 8.0, 20.0), &[], Utc::now());
        assert_eq!(ids(&insights), vec!["low-sleep", "high-stress"]);
        assert_eq!(priority_of(&insights, "low-sleep"), Some(InsightPriority::Medium));
        assert_eq!(priority_of(&insights, "high-stress"), Some(InsightPriority::Medium));

        // Just past the cutoffs
        let insights = generate_insights(&week_with(4.5, 8.5, 5.5, 29.5), &[], Utc::now());
        assert_eq!(ids(&insights), vec!["low-sleep", "high-stress", "low-hydration"]);
        assert_eq!(priority_of(&insights, "low-sleep"), Some(InsightPriority::High));
        assert_eq!(priority_of(&insights, "high-stress"), Some(InsightPriority::High));
    }

    #[test]
    fn test_static_thresholds_and_sorting() {
        let logs: Vec<LifestyleLog> = (0..7)
            .map(|d| {
                let mut log = make_log(d, 4.5, 8000);
                log.stress_level = Some(7.5);
                log.water_glasses = Some(3.0);
                log.exercise_minutes = Some(40.0);
                log
            })
            .collect();

        let insights = generate_insights(&logs, &[], Utc::now());
        assert_eq!(
            ids(&insights),
            vec!["low-sleep", "high-stress", "low-hydration", "exercise-goal"]
        );
        assert_eq!(insights[0].priority, InsightPriority::High);
        assert_eq!(insights[1].priority, InsightPriority::Medium);
        assert_eq!(insights[2].priority, InsightPriority::Low);
        assert_eq!(insights[3].priority, InsightPriority::Low);
    }

    #[test]
    fn test_stress_symptom_correlation() {
        let logs: Vec<LifestyleLog> = (0..7)
            .map(|d| {
                let mut log = make_log(d, 7.5, 8000);
                log.stress_level = Some(6.5);
                log
            })
            .collect();

        let history = vec![
            make_check(&["cough"]),
            make_check(&["fever"]),
            make_check(&["insomnia"]),
        ];
        let insights = generate_insights(&logs, &history, Utc::now());
        assert_eq!(ids(&insights), vec!["stress-symptom-correlation"]);

        // Only the three most recent checks count
        let history = vec![
            make_check(&["cough"]),
            make_check(&["fever"]),
            make_check(&["fatigue"]),
            make_check(&["headache"]),
        ];
        let insights = generate_insights(&logs, &history, Utc::now());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_priority_sort_is_stable() {
        // Sleep decline (medium, -15%) is inserted before high-stress (medium)
        let logs: Vec<LifestyleLog> = (0..14)
            .map(|d| {
                let mut log = make_log(d, if d < 7 { 6.8 } else { 8.0 }, 8000);
                log.stress_level = Some(7.5);
                log
            })
            .collect();

        let insights = generate_insights(&logs, &[], Utc::now());
        assert_eq!(ids(&insights), vec!["sleep-change", "high-stress"]);
    }
}
