//! Alert e-mail payload assembly

use crate::symptoms::{catalog, display_name};
use crate::types::{Averages, StabilityBand, SymptomCheck, Trend, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used for symptoms missing from the catalog
pub const OTHER_CATEGORY: &str = "Other";

const NO_LOGS_RECOMMENDATION: &str = "Maintain a balanced lifestyle and log your daily habits.";

/// Symptoms reported recently, grouped under one category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// One line of the wellness summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessRow {
    pub label: String,
    pub value: String,
    pub trend: Trend,
}

/// Request body handed to the alert delivery collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub recipient: String,
    pub user_name: String,
    pub health_score: f64,
    /// Stability band label, e.g. "Moderate"
    pub risk_level: String,
    pub categorized_symptoms: Vec<SymptomGroup>,
    pub wellness_insights: Vec<WellnessRow>,
    pub recommendations: Vec<String>,
    pub report_date: String,
}

impl AlertPayload {
    /// Assemble the payload for a stability score below threshold.
    ///
    /// `history` must be newest-first; only the first `recent_checks` entries
    /// are summarized.
    pub fn build(
        profile: &UserProfile,
        stability_score: f64,
        averages: &Averages,
        history: &[SymptomCheck],
        recent_checks: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            recipient: profile.email.clone(),
            user_name: profile.display_name(),
            health_score: stability_score,
            risk_level: StabilityBand::from_score(stability_score).label().to_string(),
            categorized_symptoms: categorize_symptoms(history, recent_checks),
            wellness_insights: wellness_rows(averages),
            recommendations: recommendations(averages),
            report_date: format_report_date(now),
        }
    }
}

/// Group distinct symptom display names by category, categories in
/// first-seen order
pub fn categorize_symptoms(history: &[SymptomCheck], recent_checks: usize) -> Vec<SymptomGroup> {
    let mut groups: Vec<SymptomGroup> = Vec::new();

    for check in history.iter().take(recent_checks) {
        for symptom in &check.symptoms {
            let category = catalog::category_of(symptom)
                .map(|c| c.label())
                .unwrap_or(OTHER_CATEGORY);
            let item = display_name(symptom);

            match groups.iter_mut().find(|g| g.category == category) {
                Some(group) => {
                    if !group.items.contains(&item) {
                        group.items.push(item);
                    }
                }
                None => groups.push(SymptomGroup {
                    category: category.to_string(),
                    items: vec![item],
                }),
            }
        }
    }

    groups
}

/// Summary rows for sleep, activity, steps, stress and diet.
///
/// Empty when no logs contributed to the averages.
pub fn wellness_rows(avg: &Averages) -> Vec<WellnessRow> {
    if avg.days == 0 {
        return Vec::new();
    }

    vec![
        row("Sleep Quality", format!("{:.1} hrs/night", avg.sleep), avg.sleep >= 7.0),
        row(
            "Physical Activity",
            format!("{:.0} min/day", avg.exercise),
            avg.exercise >= 30.0,
        ),
        row(
            "Daily Steps",
            format_thousands(avg.steps.round().max(0.0) as u64),
            avg.steps >= 8000.0,
        ),
        row("Stress Level", format!("{:.1}/10", avg.stress), avg.stress <= 5.0),
        row("Diet Quality", format!("{:.1}/10", avg.diet), avg.diet >= 7.0),
    ]
}

fn row(label: &str, value: String, good: bool) -> WellnessRow {
    WellnessRow {
        label: label.to_string(),
        value,
        trend: if good { Trend::Up } else { Trend::Down },
    }
}

/// Threshold-keyed advice for each lifestyle deficit
pub fn recommendations(avg: &Averages) -> Vec<String> {
    if avg.days == 0 {
        return vec![NO_LOGS_RECOMMENDATION.to_string()];
    }

    let rules: [(bool, &str); 5] = [
        (
            avg.sleep < 7.0,
            "Prioritize 7-9 hours of quality sleep each night. Establish a consistent bedtime routine.",
        ),
        (
            avg.exercise < 30.0,
            "Aim for at least 30 minutes of moderate physical activity daily, such as brisk walking.",
        ),
        (
            avg.stress > 5.0,
            "Practice stress management techniques: deep breathing, meditation, or gentle yoga.",
        ),
        (
            avg.diet < 7.0,
            "Focus on whole foods, fruits, vegetables, and lean proteins to improve diet quality.",
        ),
        (
            avg.steps < 8000.0,
            "Try to increase daily steps gradually. Walking breaks throughout the day can help.",
        ),
    ];

    let mut recs: Vec<String> = rules
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect();
    recs.push("Stay hydrated: aim for 8+ glasses of water daily.".to_string());
    recs.push("Schedule regular check-ins with a healthcare professional.".to_string());
    recs
}

/// Long-form date, e.g. "Monday, October 19, 2026"
pub fn format_report_date(now: DateTime<Utc>) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// Group digits in threes with commas
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

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

    fn poor_averages() -> Averages {
        Averages {
            sleep: 5.5,
            exercise: 12.4,
            steps: 4321.6,
            diet: 5.0,
            stress: 7.3,
            days: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_categorize_groups_in_first_seen_order() {
        let history = vec![
            make_check(&["cough", "fever"]),
            make_check(&["sore_throat", "not_in_catalog", "cough"]),
        ];
        let groups = categorize_symptoms(&history, 5);

        let respiratory = catalog::category_of("cough").map(|c| c.label());
        assert_eq!(Some(groups[0].category.as_str()), respiratory);
        assert_eq!(groups[0].items, vec!["Cough", "Sore Throat"]);

        let other = groups
            .iter()
            .find(|g| g.category == OTHER_CATEGORY)
            .expect("other group");
        assert_eq!(other.items, vec!["Not In Catalog"]);
    }

    #[test]
    fn test_categorize_only_recent_checks() {
        let history = vec![make_check(&["cough"]), make_check(&["headache"])];
        let groups = categorize_symptoms(&history, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items, vec!["Cough"]);
    }

    #[test]
    fn test_wellness_rows_format() {
        let rows = wellness_rows(&poor_averages());
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["5.5 hrs/night", "12 min/day", "4,322", "7.3/10", "5.0/10"]
        );
        assert!(rows.iter().all(|r| r.trend == Trend::Down));
    }

    #[test]
    fn test_recommendations_for_deficits() {
        let recs = recommendations(&poor_averages());
        assert_eq!(recs.len(), 7);
        assert!(recs[0].starts_with("Prioritize 7-9 hours"));
        assert!(recs[5].starts_with("Stay hydrated"));

        let healthy = Averages {
            sleep: 8.0,
            exercise: 40.0,
            steps: 9000.0,
            diet: 8.0,
            stress: 3.0,
            days: 7,
            ..Default::default()
        };
        assert_eq!(recommendations(&healthy).len(), 2);
    }

    #[test]
    fn test_no_logs_payload_sections() {
        let avg = Averages::default();
        assert!(wellness_rows(&avg).is_empty());
        assert_eq!(recommendations(&avg), vec![NO_LOGS_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn test_report_date_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(format_report_date(now), "Monday, October 19, 2026");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(8000), "8,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_payload_build() {
        let mut profile = UserProfile::new("sam@example.com");
        profile.full_name = Some("Sam Lee".to_string());
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        let payload = AlertPayload::build(
            &profile,
            48.0,
            &poor_averages(),
            &[make_check(&["headache"])],
            5,
            now,
        );

        assert_eq!(payload.recipient, "sam@example.com");
        assert_eq!(payload.user_name, "Sam Lee");
        assert_eq!(payload.risk_level, "Attention Needed");
        assert_eq!(payload.categorized_symptoms.len(), 1);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userName"], "Sam Lee");
        assert_eq!(json["reportDate"], "Monday, October 19, 2026");
        assert_eq!(json["wellnessInsights"][0]["trend"], "down");
    }
}
