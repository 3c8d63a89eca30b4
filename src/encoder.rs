//! Report encoding
//!
//! Wraps a [`WellnessReport`] in an envelope carrying producer metadata and
//! data-quality hints, then serializes it to JSON.

use crate::aggregator::DEFAULT_WINDOW;
use crate::error::EngineError;
use crate::types::WellnessReport;
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// How much data the report was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuality {
    /// Logs in the averaging window divided by the window length (0-1)
    pub coverage: f64,
    pub log_days: usize,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub quality: ReportQuality,
    pub report: WellnessReport,
}

pub struct ReportEncoder {
    instance_id: String,
    window: usize,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create an encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            instance_id,
            window: DEFAULT_WINDOW,
        }
    }

    /// Averaging window used to compute coverage
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn encode(&self, report: &WellnessReport) -> ReportEnvelope {
        self.encode_at(report, Utc::now())
    }

    pub fn encode_at(&self, report: &WellnessReport, computed_at: DateTime<Utc>) -> ReportEnvelope {
        ReportEnvelope {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: computed_at.to_rfc3339(),
            quality: self.build_quality(report),
            report: report.clone(),
        }
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json(&self, report: &WellnessReport) -> Result<String, EngineError> {
        let envelope = self.encode(report);
        serde_json::to_string_pretty(&envelope).map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    fn build_quality(&self, report: &WellnessReport) -> ReportQuality {
        let log_days = report.averages.days;
        let coverage = (log_days as f64 / self.window as f64).min(1.0);

        let mut flags = Vec::new();
        if log_days == 0 {
            flags.push("no_logs".to_string());
        } else if log_days < self.window {
            flags.push("partial_window".to_string());
        }
        if report.lifestyle_score.is_none() {
            flags.push("demo_lifestyle_score".to_string());
        }

        ReportQuality {
            coverage,
            log_days,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pipeline::build_report;
    use crate::types::LifestyleLog;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    fn make_logs(days: u32) -> Vec<LifestyleLog> {
        (1..=days)
            .map(|d| {
                let mut log = LifestyleLog::new(NaiveDate::from_ymd_opt(2024, 4, d).unwrap());
                log.sleep_hours = Some(7.5);
                log.stress_level = Some(4.0);
                log
            })
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_encode_envelope() {
        let report = build_report(&make_logs(7), &[], &EngineConfig::default(), now());
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let envelope = encoder.encode_at(&report, now());

        assert_eq!(envelope.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(envelope.producer.name, PRODUCER_NAME);
        assert_eq!(envelope.producer.version, ENGINE_VERSION);
        assert_eq!(envelope.producer.instance_id, "test-instance");
        assert_eq!(envelope.computed_at_utc, "2024-04-10T12:00:00+00:00");
        assert_eq!(envelope.quality.coverage, 1.0);
        assert!(envelope.quality.flags.is_empty());
        assert_eq!(envelope.report, report);
    }

    #[test]
    fn test_quality_flags() {
        let encoder = ReportEncoder::new();

        let partial = build_report(&make_logs(3), &[], &EngineConfig::default(), now());
        let quality = encoder.encode(&partial).quality;
        assert_eq!(quality.log_days, 3);
        assert!((quality.coverage - 3.0 / 7.0).abs() < 1e-9);
        assert_eq!(quality.flags, vec!["partial_window".to_string()]);

        let empty = build_report(&[], &[], &EngineConfig::default(), now());
        assert_eq!(
            encoder.encode(&empty).quality.flags,
            vec!["no_logs".to_string(), "demo_lifestyle_score".to_string()]
        );
    }

    #[test]
    fn test_encode_to_json() {
        let report = build_report(&make_logs(2), &[], &EngineConfig::default(), now());
        let json = ReportEncoder::new().encode_to_json(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("schema_version").is_some());
        assert!(parsed.get("producer").is_some());
        assert!(parsed.get("quality").is_some());
        assert!(parsed["report"].get("stability_score").is_some());
    }

    #[test]
    fn test_instance_ids_unique() {
        let a = ReportEncoder::new();
        let b = ReportEncoder::new();
        assert_ne!(a.instance_id, b.instance_id);
    }
}
