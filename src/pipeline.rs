//! Pipeline orchestration
//!
//! This module provides the public API of the wellness engine. It runs the
//! full derivation from raw logs and symptom history to a report:
//! aggregation → scores → insights → predictive warnings → alert trigger.

use crate::aggregator::{averages, sort_newest_first};
use crate::alert::{
    AlertDelivery, AlertMonitor, AlertOutcome, AlertPayload, AlertState, CooldownStore,
};
use crate::analysis::{AnalysisService, SymptomAssessment, SymptomAssessor};
use crate::config::EngineConfig;
use crate::encoder::ReportEncoder;
use crate::error::EngineError;
use crate::insights::generate_insights;
use crate::score::{improvement_score, lifestyle_score, stability_score};
use crate::store::{LogStore, SymptomHistoryStore};
use crate::symptoms::compute_risk;
use crate::types::{
    LifestyleLog, StabilityBand, SymptomCheck, UserProfile, WellnessReport,
};
use crate::warnings::predictive_warnings;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Derive a full report from one user's logs and symptom history.
///
/// Inputs may be in any order; they are sorted newest-first internally.
pub fn build_report(
    logs: &[LifestyleLog],
    history: &[SymptomCheck],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> WellnessReport {
    let mut logs = logs.to_vec();
    sort_newest_first(&mut logs);
    let mut history = history.to_vec();
    sort_checks_newest_first(&mut history);

    let averages = averages(&logs, config.averaging_window);
    let stability = stability_score(&averages);

    WellnessReport {
        stability_score: stability,
        stability_band: StabilityBand::from_score(stability),
        improvement: improvement_score(&logs),
        lifestyle_score: lifestyle_score(&averages),
        insights: generate_insights(&logs, &history, now),
        predictive_warnings: predictive_warnings(&history),
        alert_triggered: config.alert_policy().is_triggered(stability),
        averages,
    }
}

fn sort_checks_newest_first(history: &mut [SymptomCheck]) {
    history.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
}

/// Score a JSON array of symptom IDs and return the assessment as JSON.
///
/// # Example
/// ```ignore
/// let risk = risk_from_json(r#"["fever", "cough"]"#)?;
/// ```
pub fn risk_from_json(symptoms_json: &str) -> Result<String, EngineError> {
    let symptoms: Vec<String> = serde_json::from_str(symptoms_json)?;
    if symptoms.is_empty() {
        return Err(EngineError::EmptySymptomSet);
    }
    let risk = compute_risk(&symptoms);
    Ok(serde_json::to_string_pretty(&risk)?)
}

/// Build an encoded report from JSON arrays of logs and symptom checks.
///
/// `history_json` may be omitted when no symptom history exists.
pub fn report_from_json(
    logs_json: &str,
    history_json: Option<&str>,
    config: &EngineConfig,
) -> Result<String, EngineError> {
    let logs: Vec<LifestyleLog> = serde_json::from_str(logs_json)?;
    for log in &logs {
        log.validate().map_err(EngineError::InvalidInput)?;
    }
    let history: Vec<SymptomCheck> = match history_json {
        Some(json) => serde_json::from_str(json)?,
        None => Vec::new(),
    };

    let report = build_report(&logs, &history, config, Utc::now());
    ReportEncoder::new()
        .with_window(config.averaging_window)
        .encode_to_json(&report)
}

/// External collaborators a [`WellnessProcessor`] is wired to
pub struct Collaborators {
    pub logs: Arc<dyn LogStore>,
    pub history: Arc<dyn SymptomHistoryStore>,
    pub delivery: Arc<dyn AlertDelivery>,
    pub cooldown: Arc<dyn CooldownStore>,
    /// Narrative analysis; `None` always uses the fallback narrative
    pub analysis: Option<Arc<dyn AnalysisService>>,
}

/// Stateful processor for one user session.
///
/// Reads and writes go through the stores; the alert state lives for as long
/// as the processor does.
pub struct WellnessProcessor {
    user: Uuid,
    profile: UserProfile,
    config: EngineConfig,
    logs: Arc<dyn LogStore>,
    history: Arc<dyn SymptomHistoryStore>,
    assessor: SymptomAssessor,
    monitor: AlertMonitor,
}

impl WellnessProcessor {
    pub fn new(
        user: Uuid,
        profile: UserProfile,
        config: EngineConfig,
        collaborators: Collaborators,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let assessor = match collaborators.analysis {
            Some(service) => SymptomAssessor::new(service, config.analysis_timeout()),
            None => SymptomAssessor::offline(),
        };
        let monitor = AlertMonitor::from_config(
            user,
            &config,
            collaborators.delivery,
            collaborators.cooldown,
        )?;

        Ok(Self {
            user,
            profile,
            config,
            logs: collaborators.logs,
            history: collaborators.history,
            assessor,
            monitor,
        })
    }

    pub fn user(&self) -> Uuid {
        self.user
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Record a day's log, replacing any earlier log for the same date
    pub fn log_day(&self, log: LifestyleLog) -> Result<(), EngineError> {
        log.validate().map_err(EngineError::InvalidInput)?;
        self.logs.upsert_log(self.user, log)
    }

    /// Assess a symptom selection and append it to the history
    pub async fn check_symptoms(
        &self,
        symptoms: &[String],
        now: DateTime<Utc>,
    ) -> Result<(SymptomAssessment, SymptomCheck), EngineError> {
        let assessment = self.assessor.assess(symptoms, Some(&self.profile)).await?;
        let check = assessment.clone().into_check(now);
        self.history.append_check(self.user, check.clone())?;
        Ok((assessment, check))
    }

    pub fn report(&self, now: DateTime<Utc>) -> Result<WellnessReport, EngineError> {
        let (logs, history) = self.load()?;
        Ok(build_report(&logs, &history, &self.config, now))
    }

    /// Re-evaluate the alert trigger and send automatically when due
    pub async fn evaluate_alert(&self, now: DateTime<Utc>) -> Result<AlertOutcome, EngineError> {
        let (logs, history) = self.load()?;
        let avg = averages(&logs, self.config.averaging_window);
        let score = stability_score(&avg);
        let window = self.config.recent_check_window;

        Ok(self
            .monitor
            .evaluate(
                score,
                || AlertPayload::build(&self.profile, score, &avg, &history, window, now),
                now,
            )
            .await)
    }

    /// Send the alert on request, e.g. to retry after a failure
    pub async fn send_alert(&self, now: DateTime<Utc>) -> Result<AlertOutcome, EngineError> {
        let (logs, history) = self.load()?;
        let avg = averages(&logs, self.config.averaging_window);
        let score = stability_score(&avg);
        let window = self.config.recent_check_window;

        Ok(self
            .monitor
            .send_now(
                score,
                || AlertPayload::build(&self.profile, score, &avg, &history, window, now),
                now,
            )
            .await)
    }

    pub async fn alert_state(&self) -> AlertState {
        self.monitor.state().await
    }

    fn load(&self) -> Result<(Vec<LifestyleLog>, Vec<SymptomCheck>), EngineError> {
        let limit = self.config.history_limit;
        let logs = self.logs.list_logs(self.user, limit)?;
        let history = self.history.list_checks(self.user, limit)?;
        Ok((logs, history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertStatus, MemoryCooldownStore, SendBlocked};
    use crate::store::{MemoryLogStore, MemorySymptomHistory};
    use crate::types::{RiskLevel, Trend};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDelivery {
        sent: Mutex<Vec<AlertPayload>>,
    }

    #[async_trait]
    impl AlertDelivery for RecordingDelivery {
        async fn deliver(&self, payload: &AlertPayload) -> Result<(), EngineError> {
            self.sent.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 7, 0, 0).unwrap()
    }

    fn healthy_log(day: u32) -> LifestyleLog {
        let mut log = LifestyleLog::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap());
        log.sleep_hours = Some(8.0);
        log.exercise_minutes = Some(35.0);
        log.daily_steps = Some(12000);
        log.diet_quality = Some(8.0);
        log.stress_level = Some(3.0);
        log
    }

    fn poor_log(day: u32) -> LifestyleLog {
        let mut log = LifestyleLog::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap());
        log.sleep_hours = Some(5.0);
        log.exercise_minutes = Some(10.0);
        log.daily_steps = Some(3000);
        log.diet_quality = Some(4.0);
        log.stress_level = Some(8.0);
        log
    }

    fn make_check(hours_ago: i64, symptoms: &[&str]) -> SymptomCheck {
        SymptomCheck {
            id: Uuid::new_v4(),
            checked_at: now() - Duration::hours(hours_ago),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            risk_level: RiskLevel::Medium,
            risk_score: 40,
            analysis: String::new(),
            recommendations: Vec::new(),
        }
    }

    fn make_processor(delivery: Arc<RecordingDelivery>) -> WellnessProcessor {
        let mut profile = UserProfile::new("robin@example.com");
        profile.full_name = Some("Robin".to_string());
        WellnessProcessor::new(
            Uuid::new_v4(),
            profile,
            EngineConfig::default(),
            Collaborators {
                logs: Arc::new(MemoryLogStore::new()),
                history: Arc::new(MemorySymptomHistory::new()),
                delivery,
                cooldown: Arc::new(MemoryCooldownStore::new()),
                analysis: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_healthy_week_clamps_to_100() {
        let logs: Vec<LifestyleLog> = (1..=7).map(healthy_log).collect();
        let report = build_report(&logs, &[], &EngineConfig::default(), now());

        assert_eq!(report.stability_score, 100.0);
        assert_eq!(report.stability_band, StabilityBand::Low);
        assert!(!report.alert_triggered);
        assert_eq!(report.averages.days, 7);
        assert!(report.lifestyle_score.is_some());
        assert_eq!(report.improvement.trend, Trend::Stable);
    }

    #[test]
    fn test_poor_week_triggers_alert() {
        let logs: Vec<LifestyleLog> = (1..=7).map(poor_log).collect();
        let report = build_report(&logs, &[], &EngineConfig::default(), now());

        // 50 + 5 + 3 + 2 + 4 + 2
        assert!((report.stability_score - 66.0).abs() < 1e-9);
        assert!(!report.alert_triggered);

        let strict = EngineConfig {
            alert_threshold: 70.0,
            ..Default::default()
        };
        assert!(build_report(&logs, &[], &strict, now()).alert_triggered);
    }

    #[test]
    fn test_report_sorts_inputs() {
        let mut logs: Vec<LifestyleLog> = (1..=7).map(healthy_log).collect();
        logs.push(poor_log(20));
        logs.reverse();
        logs.swap(0, 3);

        let history = vec![
            make_check(48, &["headache"]),
            make_check(1, &["headache"]),
            make_check(24, &["headache"]),
        ];
        let report = build_report(&logs, &history, &EngineConfig::default(), now());

        // Latest log is the poor one regardless of input order
        assert!(report.improvement.previous_score.is_some());
        assert_eq!(report.improvement.trend, Trend::Down);
        assert_eq!(report.predictive_warnings.len(), 1);
        assert_eq!(report.predictive_warnings[0].probability, 70);
    }

    #[test]
    fn test_empty_inputs() {
        let report = build_report(&[], &[], &EngineConfig::default(), now());
        assert_eq!(report.averages.days, 0);
        assert!(report.lifestyle_score.is_none());
        assert!(report.insights.is_empty());
        assert!(report.predictive_warnings.is_empty());
    }

    #[test]
    fn test_risk_from_json() {
        let json = risk_from_json(r#"["fever", "cough", "sore_throat", "fatigue"]"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "high");
        assert_eq!(value["matched_patterns"][0], "viral infection pattern");

        assert!(matches!(risk_from_json("[]"), Err(EngineError::EmptySymptomSet)));
        assert!(matches!(risk_from_json("{"), Err(EngineError::JsonError(_))));
    }

    #[test]
    fn test_report_from_json() {
        let logs = serde_json::to_string(&vec![healthy_log(1), healthy_log(2)]).unwrap();
        let json = report_from_json(&logs, None, &EngineConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["producer"]["name"], crate::PRODUCER_NAME);
        assert_eq!(value["report"]["averages"]["days"], 2);
    }

    #[test]
    fn test_report_from_json_rejects_invalid_log() {
        let mut log = healthy_log(1);
        log.stress_level = Some(14.0);
        let logs = serde_json::to_string(&vec![log]).unwrap();
        assert!(matches!(
            report_from_json(&logs, None, &EngineConfig::default()),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_processor_check_symptoms_records_history() {
        let processor = make_processor(Arc::new(RecordingDelivery::default()));
        let symptoms = vec!["chest_pain".to_string(), "palpitations".to_string()];

        let (assessment, check) = processor.check_symptoms(&symptoms, now()).await.unwrap();
        assert!(assessment.used_fallback);
        assert_eq!(check.risk_level, RiskLevel::High);

        assert!(matches!(
            processor.check_symptoms(&[], now()).await,
            Err(EngineError::EmptySymptomSet)
        ));
    }

    #[tokio::test]
    async fn test_processor_alert_flow() {
        let delivery = Arc::new(RecordingDelivery::default());
        let processor = make_processor(delivery.clone());

        for day in 1..=7 {
            let mut log = poor_log(day);
            log.exercise_minutes = Some(0.0);
            log.stress_level = Some(10.0);
            processor.log_day(log).unwrap();
        }
        processor
            .check_symptoms(&["headache".to_string(), "cough".to_string()], now())
            .await
            .unwrap();

        let report = processor.report(now()).unwrap();
        assert!(report.alert_triggered);

        assert_eq!(processor.evaluate_alert(now()).await.unwrap(), AlertOutcome::Sent);
        assert_eq!(
            processor.evaluate_alert(now() + Duration::hours(1)).await.unwrap(),
            AlertOutcome::Skipped {
                reason: SendBlocked::InCooldown
            }
        );
        assert_eq!(processor.alert_state().await.status, AlertStatus::Sent);

        let sent = delivery.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_name, "Robin");
        assert_eq!(sent[0].categorized_symptoms.len(), 2);
        assert_eq!(sent[0].wellness_insights.len(), 5);
    }

    #[tokio::test]
    async fn test_processor_manual_send_requires_trigger() {
        let processor = make_processor(Arc::new(RecordingDelivery::default()));
        for day in 1..=7 {
            processor.log_day(healthy_log(day)).unwrap();
        }
        assert_eq!(
            processor.send_alert(now()).await.unwrap(),
            AlertOutcome::Skipped {
                reason: SendBlocked::NotTriggered
            }
        );
    }

    #[test]
    fn test_log_day_rejects_invalid() {
        let processor = make_processor(Arc::new(RecordingDelivery::default()));
        let mut log = healthy_log(1);
        log.sleep_hours = Some(30.0);
        assert!(matches!(
            processor.log_day(log),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
