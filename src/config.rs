//! Engine configuration
//!
//! Every field has a default, so a partial JSON file (or none at all) is a
//! valid configuration.

use crate::alert::AlertPolicy;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Longest accepted alert cooldown (one year)
pub const MAX_COOLDOWN_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stability scores strictly below this trigger an alert (0-100)
    pub alert_threshold: f64,
    pub cooldown_hours: i64,
    pub delivery_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    /// Days averaged for the stability and lifestyle scores
    pub averaging_window: usize,
    /// Logs and checks fetched from the stores per report
    pub history_limit: usize,
    /// Checks summarized in the alert payload
    pub recent_check_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alert_threshold: 65.0,
            cooldown_hours: 24,
            delivery_timeout_secs: 20,
            analysis_timeout_secs: 30,
            averaging_window: 7,
            history_limit: 30,
            recent_check_window: 5,
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=100.0).contains(&self.alert_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "alert_threshold must be within 0-100, got {}",
                self.alert_threshold
            )));
        }
        if !(1..=MAX_COOLDOWN_HOURS).contains(&self.cooldown_hours) {
            return Err(EngineError::InvalidConfig(format!(
                "cooldown_hours must be within 1-{}, got {}",
                MAX_COOLDOWN_HOURS, self.cooldown_hours
            )));
        }
        if self.delivery_timeout_secs == 0 || self.analysis_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "timeouts must be positive".to_string(),
            ));
        }
        if self.averaging_window == 0 || self.history_limit == 0 || self.recent_check_window == 0 {
            return Err(EngineError::InvalidConfig(
                "windows and limits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Policy for the alert monitor; the cooldown is clamped for unvalidated configs
    pub fn alert_policy(&self) -> AlertPolicy {
        AlertPolicy {
            threshold: self.alert_threshold,
            cooldown: chrono::Duration::hours(self.cooldown_hours.clamp(0, MAX_COOLDOWN_HOURS)),
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}
