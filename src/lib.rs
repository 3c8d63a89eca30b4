//! Wellness Engine - deterministic symptom-risk scoring, lifestyle insights and
//! health alerting
//!
//! The engine turns self-reported daily lifestyle logs and symptom selections
//! into risk levels, health scores, insights, predictive warnings and alert
//! decisions: symptom risk → lifestyle aggregation → health scores →
//! insights & warnings → alert trigger.
//!
//! ## Modules
//!
//! - **Scoring core**: `symptoms`, `aggregator`, `score`, `insights`, `warnings`
//!   are pure functions over logs and history
//! - **Alerting**: `alert` holds the trigger state machine and the async
//!   delivery orchestration
//! - **Collaborators**: `store`, `analysis` and `chat` describe the external
//!   services the engine talks to
//! - **Orchestration**: `pipeline` ties everything together for one user

pub mod aggregator;
pub mod alert;
pub mod analysis;
pub mod chat;
pub mod config;
pub mod encoder;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod score;
pub mod store;
pub mod symptoms;
pub mod types;
pub mod warnings;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use alert::{AlertDelivery, AlertMonitor, AlertOutcome, AlertPayload, AlertStatus};
pub use analysis::{AnalysisService, SymptomAssessment, SymptomAssessor};
pub use config::EngineConfig;
pub use encoder::ReportEncoder;
pub use error::EngineError;
pub use pipeline::{build_report, report_from_json, risk_from_json, Collaborators, WellnessProcessor};
pub use symptoms::compute_risk;
pub use types::{LifestyleLog, RiskLevel, SymptomCheck, UserProfile, WellnessReport};

/// Engine version embedded in all report envelopes
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "wellness-engine";
