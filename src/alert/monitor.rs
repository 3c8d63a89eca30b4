//! Async alert orchestration
//!
//! [`AlertMonitor`] owns one user's [`AlertState`] behind a `tokio` mutex. The
//! lock covers only the state transitions: it is released while the delivery
//! collaborator runs, and the `idle|error → sending` transition taken under
//! the lock is what turns concurrent duplicate requests away.
//!
//! Delivery runs on a spawned task that also records the outcome, so a caller
//! that stops awaiting mid-send never leaves the state stuck in `sending`.

use super::cooldown::CooldownStore;
use super::report::AlertPayload;
use super::state::{AlertPolicy, AlertState, SendBlocked};
use crate::config::EngineConfig;
use crate::error::EngineError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// E-mail (or other channel) delivery of an alert payload
#[async_trait]
pub trait AlertDelivery: Send + Sync {
    async fn deliver(&self, payload: &AlertPayload) -> Result<(), EngineError>;
}

/// Result of one evaluate or send request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AlertOutcome {
    Sent,
    Failed { reason: String },
    Skipped { reason: SendBlocked },
}

pub struct AlertMonitor {
    user: Uuid,
    policy: AlertPolicy,
    timeout: Duration,
    delivery: Arc<dyn AlertDelivery>,
    cooldown: Arc<dyn CooldownStore>,
    state: Arc<Mutex<AlertState>>,
}

impl AlertMonitor {
    /// Create a monitor for `user`, restoring the persisted cooldown marker
    pub fn new(
        user: Uuid,
        policy: AlertPolicy,
        timeout: Duration,
        delivery: Arc<dyn AlertDelivery>,
        cooldown: Arc<dyn CooldownStore>,
    ) -> Result<Self, EngineError> {
        let last_sent_at = cooldown.load(user)?;
        Ok(Self {
            user,
            policy,
            timeout,
            delivery,
            cooldown,
            state: Arc::new(Mutex::new(AlertState::new(last_sent_at))),
        })
    }

    pub fn from_config(
        user: Uuid,
        config: &EngineConfig,
        delivery: Arc<dyn AlertDelivery>,
        cooldown: Arc<dyn CooldownStore>,
    ) -> Result<Self, EngineError> {
        Self::new(
            user,
            config.alert_policy(),
            config.delivery_timeout(),
            delivery,
            cooldown,
        )
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> AlertState {
        self.state.lock().await.clone()
    }

    /// Feed a fresh stability score; dispatches automatically when due.
    ///
    /// `build` is only invoked when a send actually starts.
    pub async fn evaluate<F>(&self, score: f64, build: F, now: DateTime<Utc>) -> AlertOutcome
    where
        F: FnOnce() -> AlertPayload,
    {
        {
            let mut state = self.state.lock().await;
            if !state.observe(score, &self.policy, now) {
                let reason = state
                    .blocked_reason(&self.policy, now)
                    .unwrap_or(SendBlocked::AlreadySentThisEpisode);
                tracing::debug!(user = %self.user, score, ?reason, "alert not dispatched");
                return AlertOutcome::Skipped { reason };
            }
        }
        self.dispatch(build(), now).await
    }

    /// Caller-initiated send, e.g. a retry after a failed delivery
    pub async fn send_now<F>(&self, score: f64, build: F, now: DateTime<Utc>) -> AlertOutcome
    where
        F: FnOnce() -> AlertPayload,
    {
        {
            let mut state = self.state.lock().await;
            if let Err(reason) = state.begin_manual_send(score, &self.policy, now) {
                tracing::debug!(user = %self.user, score, ?reason, "manual alert rejected");
                return AlertOutcome::Skipped { reason };
            }
        }
        self.dispatch(build(), now).await
    }

    async fn dispatch(&self, payload: AlertPayload, now: DateTime<Utc>) -> AlertOutcome {
        tracing::info!(
            user = %self.user,
            score = payload.health_score,
            risk_level = %payload.risk_level,
            "dispatching health alert"
        );

        let task = DeliveryTask {
            user: self.user,
            timeout: self.timeout,
            delivery: Arc::clone(&self.delivery),
            cooldown: Arc::clone(&self.cooldown),
            state: Arc::clone(&self.state),
        };

        match tokio::spawn(task.run(payload, now)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state.lock().await.complete_send(false, now);
                tracing::warn!(user = %self.user, error = %e, "health alert delivery task aborted");
                AlertOutcome::Failed {
                    reason: format!("delivery task aborted: {}", e),
                }
            }
        }
    }
}

/// One in-flight delivery; owns everything it needs to finish on its own
struct DeliveryTask {
    user: Uuid,
    timeout: Duration,
    delivery: Arc<dyn AlertDelivery>,
    cooldown: Arc<dyn CooldownStore>,
    state: Arc<Mutex<AlertState>>,
}

impl DeliveryTask {
    async fn run(self, payload: AlertPayload, now: DateTime<Utc>) -> AlertOutcome {
        let result = match tokio::time::timeout(self.timeout, self.delivery.deliver(&payload)).await
        {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout.as_secs())),
        };

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.complete_send(true, now);
                if let Err(e) = self.cooldown.save(self.user, now) {
                    tracing::warn!(user = %self.user, error = %e, "failed to persist alert cooldown");
                }
                tracing::info!(user = %self.user, "health alert sent");
                AlertOutcome::Sent
            }
            Err(e) => {
                state.complete_send(false, now);
                tracing::warn!(user = %self.user, error = %e, "health alert delivery failed");
                AlertOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
