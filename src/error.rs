//! Error types for the wellness engine

use thiserror::Error;

/// Errors that can occur while scoring, assessing or alerting
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Symptom set is empty: select at least one symptom")]
    EmptySymptomSet,

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Alert delivery failed: {0}")]
    DeliveryError(String),

    #[error("Analysis service error: {0}")]
    AnalysisError(String),

    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::PersistenceError(e.to_string())
    }
}
