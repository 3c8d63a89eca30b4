//! Core types for the wellness engine
//!
//! This module defines the data structures that flow through the engine:
//! daily lifestyle logs, symptom checks, risk assessments, lifestyle averages,
//! scores, insights and predictive warnings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discrete risk classification of a symptom set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a normalized risk score (0-1).
    ///
    /// Boundaries are inclusive on the lower edge: 0.4 is medium, 0.7 is high.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            RiskLevel::High
        } else if score >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Moderate",
            RiskLevel::High => "Attention Needed",
        }
    }
}

/// Result of scoring a symptom set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Normalized risk score (0-1)
    pub score: f64,
    /// Level derived from the score
    pub level: RiskLevel,
    /// Labels of co-occurrence clusters matched by at least two symptoms
    pub matched_patterns: Vec<String>,
}

impl RiskAssessment {
    /// Score as a rounded percentage (0-100)
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// One day of self-reported lifestyle data.
///
/// Numeric fields are optional; every consumer treats a missing value as zero
/// unless documented otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleLog {
    /// Calendar date the log describes (at most one log per user and date)
    #[serde(alias = "log_date")]
    pub date: NaiveDate,
    pub sleep_hours: Option<f64>,
    pub exercise_minutes: Option<f64>,
    pub daily_steps: Option<u32>,
    /// Diet quality (0-10)
    pub diet_quality: Option<f64>,
    /// Stress level (0-10)
    pub stress_level: Option<f64>,
    pub water_glasses: Option<f64>,
    #[serde(default)]
    pub smoking: bool,
    #[serde(default)]
    pub alcohol_units: f64,
    pub family_time_minutes: Option<f64>,
    /// Social interaction quality (0-10)
    pub social_quality: Option<f64>,
    pub spiritual_minutes: Option<f64>,
    pub mental_relaxation_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LifestyleLog {
    /// Create an empty log for the given date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sleep_hours: None,
            exercise_minutes: None,
            daily_steps: None,
            diet_quality: None,
            stress_level: None,
            water_glasses: None,
            smoking: false,
            alcohol_units: 0.0,
            family_time_minutes: None,
            social_quality: None,
            spiritual_minutes: None,
            mental_relaxation_minutes: None,
            notes: None,
        }
    }

    /// Reject values no form could produce: negative or non-finite numbers,
    /// more than 24 hours of sleep, ratings above 10
    pub fn validate(&self) -> Result<(), String> {
        let amounts = [
            ("sleep_hours", self.sleep_hours),
            ("exercise_minutes", self.exercise_minutes),
            ("water_glasses", self.water_glasses),
            ("family_time_minutes", self.family_time_minutes),
            ("spiritual_minutes", self.spiritual_minutes),
            ("mental_relaxation_minutes", self.mental_relaxation_minutes),
            ("alcohol_units", Some(self.alcohol_units)),
        ];
        for (name, value) in amounts {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{} must be a non-negative number, got {}", name, v));
                }
            }
        }

        if self.sleep() > 24.0 {
            return Err(format!("sleep_hours cannot exceed 24, got {}", self.sleep()));
        }

        let ratings = [
            ("diet_quality", self.diet_quality),
            ("stress_level", self.stress_level),
            ("social_quality", self.social_quality),
        ];
        for (name, value) in ratings {
            if let Some(v) = value {
                if !(0.0..=10.0).contains(&v) {
                    return Err(format!("{} must be within 0-10, got {}", name, v));
                }
            }
        }
        Ok(())
    }

    pub fn sleep(&self) -> f64 {
        self.sleep_hours.unwrap_or(0.0)
    }

    pub fn exercise(&self) -> f64 {
        self.exercise_minutes.unwrap_or(0.0)
    }

    pub fn steps(&self) -> f64 {
        self.daily_steps.map(f64::from).unwrap_or(0.0)
    }

    pub fn diet(&self) -> f64 {
        self.diet_quality.unwrap_or(0.0)
    }

    pub fn stress(&self) -> f64 {
        self.stress_level.unwrap_or(0.0)
    }

    pub fn water(&self) -> f64 {
        self.water_glasses.unwrap_or(0.0)
    }

    pub fn family_time(&self) -> f64 {
        self.family_time_minutes.unwrap_or(0.0)
    }

    pub fn social(&self) -> f64 {
        self.social_quality.unwrap_or(0.0)
    }

    pub fn spiritual(&self) -> f64 {
        self.spiritual_minutes.unwrap_or(0.0)
    }

    pub fn mental_relaxation(&self) -> f64 {
        self.mental_relaxation_minutes.unwrap_or(0.0)
    }
}

/// Immutable record of one symptom analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCheck {
    pub id: Uuid,
    pub checked_at: DateTime<Utc>,
    /// Selected symptom IDs (non-empty)
    pub symptoms: Vec<String>,
    pub risk_level: RiskLevel,
    /// Risk score as a percentage (0-100)
    pub risk_score: u32,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

impl SymptomCheck {
    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }
}

/// Account profile passed to collaborators for personalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Full name when set, otherwise the local part of the e-mail address
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Rolling-window means of lifestyle metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    pub sleep: f64,
    pub exercise: f64,
    pub steps: f64,
    pub diet: f64,
    pub stress: f64,
    pub water: f64,
    pub family_time: f64,
    pub social_quality: f64,
    pub spiritual_time: f64,
    pub mental_relaxation: f64,
    /// Number of logs that contributed
    pub days: usize,
}

/// Direction of change between two observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// How a factor affects the improvement score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorImpact {
    Positive,
    Neutral,
    Negative,
}

/// One entry of the improvement score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub name: String,
    pub impact: FactorImpact,
    /// Rounded points contributed (negative for penalties)
    pub value: i32,
}

/// Insight-card health score derived from the latest log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementScore {
    pub score: u32,
    /// Score of the second-most-recent log, if one exists
    pub previous_score: Option<u32>,
    /// Sleep-only trend between the two most recent logs
    pub trend: Trend,
    pub factors: Vec<HealthFactor>,
}

/// Coarse label attached to a stability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityBand {
    Low,
    Moderate,
    AttentionNeeded,
}

impl StabilityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            StabilityBand::Low
        } else if score >= 50.0 {
            StabilityBand::Moderate
        } else {
            StabilityBand::AttentionNeeded
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StabilityBand::Low => "Low",
            StabilityBand::Moderate => "Moderate",
            StabilityBand::AttentionNeeded => "Attention Needed",
        }
    }
}

/// Kind of insight shown in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Warning,
    Improvement,
    Suggestion,
    Achievement,
}

/// Lifestyle area an insight refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Sleep,
    Activity,
    Stress,
    Hydration,
}

/// Display priority of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

impl InsightPriority {
    /// Sort rank, lower first
    pub fn rank(&self) -> u8 {
        match self {
            InsightPriority::High => 0,
            InsightPriority::Medium => 1,
            InsightPriority::Low => 2,
        }
    }
}

/// Quantity attached to an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetric {
    pub value: f64,
    pub change: f64,
    pub unit: String,
}

/// Derived, non-persisted insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<InsightMetric>,
    pub priority: InsightPriority,
    pub timestamp: DateTime<Utc>,
}

/// Risk tier of a predictive warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Moderate,
    Elevated,
    High,
}

/// Recurrence-based warning about a symptom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveWarning {
    pub id: String,
    /// Display name of the recurring symptom
    pub symptom: String,
    pub risk_level: WarningLevel,
    /// Estimated probability of recurrence (0-100)
    pub probability: u32,
    pub based_on: Vec<String>,
    pub preventive_actions: Vec<String>,
    pub timeframe: String,
}

/// Everything derived from one user's logs and symptom history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessReport {
    pub averages: Averages,
    pub stability_score: f64,
    pub stability_band: StabilityBand,
    pub improvement: ImprovementScore,
    /// Dashboard score; absent until the first log exists
    pub lifestyle_score: Option<f64>,
    pub insights: Vec<HealthInsight>,
    pub predictive_warnings: Vec<PredictiveWarning>,
    pub alert_triggered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.39999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_stability_band() {
        assert_eq!(StabilityBand::from_score(70.0), StabilityBand::Low);
        assert_eq!(StabilityBand::from_score(69.9), StabilityBand::Moderate);
        assert_eq!(StabilityBand::from_score(50.0), StabilityBand::Moderate);
        assert_eq!(
            StabilityBand::from_score(49.0).label(),
            "Attention Needed"
        );
    }

    #[test]
    fn test_log_deserializes_with_missing_fields() {
        let log: LifestyleLog =
            serde_json::from_str(r#"{"log_date": "2024-03-01", "sleep_hours": 7.5}"#).unwrap();

        assert_eq!(log.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(log.sleep(), 7.5);
        assert_eq!(log.stress(), 0.0);
        assert_eq!(log.steps(), 0.0);
        assert!(!log.smoking);
    }

    #[test]
    fn test_log_validation() {
        let mut log = LifestyleLog::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        log.sleep_hours = Some(7.5);
        log.stress_level = Some(10.0);
        assert!(log.validate().is_ok());

        log.stress_level = Some(11.0);
        assert!(log.validate().unwrap_err().contains("stress_level"));

        log.stress_level = None;
        log.exercise_minutes = Some(-5.0);
        assert!(log.validate().is_err());

        log.exercise_minutes = None;
        log.sleep_hours = Some(f64::NAN);
        assert!(log.validate().is_err());
    }

    #[test]
    fn test_profile_display_name() {
        let mut profile = UserProfile::new("jane.doe@example.com");
        assert_eq!(profile.display_name(), "jane.doe");

        profile.full_name = Some("  ".to_string());
        assert_eq!(profile.display_name(), "jane.doe");

        profile.full_name = Some("Jane Doe".to_string());
        assert_eq!(profile.display_name(), "Jane Doe");
    }

    #[test]
    fn test_insight_type_serializes_as_type() {
        let insight = HealthInsight {
            id: "low-sleep".to_string(),
            insight_type: InsightType::Warning,
            category: InsightCategory::Sleep,
            title: "t".to_string(),
            message: "m".to_string(),
            metric: None,
            priority: InsightPriority::High,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&insight).unwrap();
        assert_eq!(value["type"], "warning");
        assert_eq!(value["priority"], "high");
        assert!(value.get("metric").is_none());
    }
}
