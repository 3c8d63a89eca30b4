//! Alert trigger state machine
//!
//! Pure transitions over `idle → sending → sent | error`. The caller supplies
//! the current time and stability score; the state decides whether a send may
//! start. Only `last_sent_at` is meant to be persisted, the episode flag and
//! status are session-local.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status of the current alert episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Idle,
    Sending,
    Sent,
    Error,
}

/// Threshold and cooldown applied to the stability score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    /// Scores strictly below this trigger an alert
    pub threshold: f64,
    /// Minimum interval between two sends
    pub cooldown: Duration,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: 65.0,
            cooldown: Duration::hours(24),
        }
    }
}

impl AlertPolicy {
    pub fn is_triggered(&self, score: f64) -> bool {
        score < self.threshold
    }
}

/// Why a send request did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendBlocked {
    NotTriggered,
    InCooldown,
    AlreadySending,
    AlreadySentThisEpisode,
    AwaitingRetry,
}

/// Session state of the alert controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    pub status: AlertStatus,
    pub last_sent_at: Option<DateTime<Utc>>,
    /// Set once an automatic send starts; cleared when the episode ends
    pub sent_this_episode: bool,
    pub is_triggered: bool,
}

impl Default for AlertState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AlertState {
    /// Fresh session state, seeded with the persisted cooldown marker
    pub fn new(last_sent_at: Option<DateTime<Utc>>) -> Self {
        Self {
            status: AlertStatus::Idle,
            last_sent_at,
            sent_this_episode: false,
            is_triggered: false,
        }
    }

    pub fn is_in_cooldown(&self, policy: &AlertPolicy, now: DateTime<Utc>) -> bool {
        match self.last_sent_at {
            Some(sent) => now - sent < policy.cooldown,
            None => false,
        }
    }

    /// Feed a new stability score.
    ///
    /// Ends the episode when the trigger clears or the cooldown lapses, then
    /// starts an automatic send if one is due. Returns `true` when the caller
    /// must dispatch; the state is then `Sending`.
    pub fn observe(&mut self, score: f64, policy: &AlertPolicy, now: DateTime<Utc>) -> bool {
        self.is_triggered = policy.is_triggered(score);
        let in_cooldown = self.is_in_cooldown(policy, now);

        if !self.is_triggered || !in_cooldown {
            self.sent_this_episode = false;
            match self.status {
                AlertStatus::Sent => self.status = AlertStatus::Idle,
                AlertStatus::Error if !self.is_triggered => self.status = AlertStatus::Idle,
                _ => {}
            }
        }

        let due = self.is_triggered
            && !in_cooldown
            && self.status == AlertStatus::Idle
            && !self.sent_this_episode;

        if due {
            self.sent_this_episode = true;
            self.status = AlertStatus::Sending;
        }
        due
    }

    /// Start a caller-initiated send from `Idle` or `Error`.
    ///
    /// The trigger and cooldown still apply; a send already in flight blocks.
    pub fn begin_manual_send(
        &mut self,
        score: f64,
        policy: &AlertPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), SendBlocked> {
        self.is_triggered = policy.is_triggered(score);

        match self.status {
            AlertStatus::Sending => return Err(SendBlocked::AlreadySending),
            AlertStatus::Sent if self.is_in_cooldown(policy, now) => {
                return Err(SendBlocked::AlreadySentThisEpisode)
            }
            _ => {}
        }
        if !self.is_triggered {
            return Err(SendBlocked::NotTriggered);
        }
        if self.is_in_cooldown(policy, now) {
            return Err(SendBlocked::InCooldown);
        }

        self.sent_this_episode = true;
        self.status = AlertStatus::Sending;
        Ok(())
    }

    /// Why an automatic send would not start right now
    pub fn blocked_reason(&self, policy: &AlertPolicy, now: DateTime<Utc>) -> Option<SendBlocked> {
        if self.status == AlertStatus::Sending {
            Some(SendBlocked::AlreadySending)
        } else if !self.is_triggered {
            Some(SendBlocked::NotTriggered)
        } else if self.is_in_cooldown(policy, now) {
            Some(SendBlocked::InCooldown)
        } else if self.status == AlertStatus::Error {
            Some(SendBlocked::AwaitingRetry)
        } else if self.sent_this_episode {
            Some(SendBlocked::AlreadySentThisEpisode)
        } else {
            None
        }
    }

    /// Record the outcome of the send started by `observe` or `begin_manual_send`
    pub fn complete_send(&mut self, delivered: bool, now: DateTime<Utc>) {
        if self.status != AlertStatus::Sending {
            return;
        }
        if delivered {
            self.status = AlertStatus::Sent;
            self.last_sent_at = Some(now);
        } else {
            self.status = AlertStatus::Error;
        }
    }
}
