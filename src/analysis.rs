//! Symptom assessment
//!
//! The risk level is always computed locally. A generative analysis service
//! may add narrative guidance, but its own risk judgment is discarded. When
//! the service is missing, slow or failing, a canned narrative is used and the
//! local risk still stands.

use crate::error::EngineError;
use crate::symptoms::compute_risk;
use crate::types::{RiskAssessment, RiskLevel, SymptomCheck, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Confidence attached to a possible cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleCause {
    pub cause: String,
    pub confidence: Confidence,
}

/// Non-identifying profile fields shared with remote services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileContext {
    pub age: Option<u32>,
    pub gender: Option<String>,
    #[serde(rename = "height")]
    pub height_cm: Option<f64>,
    #[serde(rename = "weight")]
    pub weight_kg: Option<f64>,
}

impl From<&UserProfile> for ProfileContext {
    fn from(profile: &UserProfile) -> Self {
        Self {
            age: profile.age,
            gender: profile.gender.clone(),
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<ProfileContext>,
    /// Locally computed risk as a percentage, given as context only
    pub risk_score: u32,
}

/// Narrative part of an analysis; every list may be empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis: String,
    pub possible_causes: Vec<PossibleCause>,
    pub immediate_actions: Vec<String>,
    pub lifestyle_changes: Vec<String>,
    pub monitoring_advice: Vec<String>,
    pub doctor_triggers: Vec<String>,
    pub recommendations: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AnalysisResponse {
    /// Generic guidance used when no remote narrative is available
    pub fn fallback() -> Self {
        Self {
            analysis: "Unable to complete full analysis. Based on the symptoms provided, we \
                       recommend monitoring your condition and consulting a healthcare \
                       professional if symptoms persist or worsen."
                .to_string(),
            possible_causes: vec![
                PossibleCause {
                    cause: "Multiple factors may contribute to your symptoms".to_string(),
                    confidence: Confidence::Medium,
                },
                PossibleCause {
                    cause: "Lifestyle or environmental factors".to_string(),
                    confidence: Confidence::Low,
                },
            ],
            immediate_actions: strings(&["Rest and stay hydrated", "Monitor symptom progression"]),
            lifestyle_changes: strings(&[
                "Ensure adequate sleep (7-9 hours)",
                "Maintain balanced nutrition",
            ]),
            monitoring_advice: strings(&[
                "Track when symptoms occur",
                "Note any patterns or triggers",
            ]),
            doctor_triggers: strings(&[
                "Symptoms persist beyond 48-72 hours",
                "Symptoms significantly worsen",
                "New concerning symptoms develop",
            ]),
            recommendations: strings(&[
                "Consult with a healthcare provider for proper evaluation",
                "Keep a symptom diary for your next medical visit",
            ]),
        }
    }
}

/// Remote generative analysis
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, EngineError>;
}

/// Local risk merged with remote (or fallback) narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomAssessment {
    pub symptoms: Vec<String>,
    pub risk: RiskAssessment,
    pub narrative: AnalysisResponse,
    /// True when the narrative is the canned fallback
    pub used_fallback: bool,
}

impl SymptomAssessment {
    pub fn risk_level(&self) -> RiskLevel {
        self.risk.level
    }

    pub fn risk_score(&self) -> u32 {
        self.risk.percent()
    }

    /// Freeze into a history record
    pub fn into_check(self, checked_at: DateTime<Utc>) -> SymptomCheck {
        let risk_score = self.risk.percent();
        SymptomCheck {
            id: Uuid::new_v4(),
            checked_at,
            symptoms: self.symptoms,
            risk_level: self.risk.level,
            risk_score,
            analysis: self.narrative.analysis,
            recommendations: self.narrative.recommendations,
        }
    }
}

pub struct SymptomAssessor {
    service: Option<Arc<dyn AnalysisService>>,
    timeout: Duration,
}

impl SymptomAssessor {
    pub fn new(service: Arc<dyn AnalysisService>, timeout: Duration) -> Self {
        Self {
            service: Some(service),
            timeout,
        }
    }

    /// Assessor that never calls out and always uses the fallback narrative
    pub fn offline() -> Self {
        Self {
            service: None,
            timeout: Duration::ZERO,
        }
    }

    pub async fn assess(
        &self,
        symptoms: &[String],
        profile: Option<&UserProfile>,
    ) -> Result<SymptomAssessment, EngineError> {
        if symptoms.is_empty() {
            return Err(EngineError::EmptySymptomSet);
        }

        let risk = compute_risk(symptoms);
        let (narrative, used_fallback) = match &self.service {
            Some(service) => {
                let request = AnalysisRequest {
                    symptoms: symptoms.to_vec(),
                    user_profile: profile.map(ProfileContext::from),
                    risk_score: risk.percent(),
                };
                match self.call(service.as_ref(), &request).await {
                    Ok(narrative) => (narrative, false),
                    Err(e) => {
                        tracing::warn!(error = %e, "symptom analysis failed, using fallback narrative");
                        (AnalysisResponse::fallback(), true)
                    }
                }
            }
            None => (AnalysisResponse::fallback(), true),
        };

        Ok(SymptomAssessment {
            symptoms: symptoms.to_vec(),
            risk,
            narrative,
            used_fallback,
        })
    }

    async fn call(
        &self,
        service: &dyn AnalysisService,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, EngineError> {
        match tokio::time::timeout(self.timeout, service.analyze(request)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout.as_secs())),
        }
    }
}
