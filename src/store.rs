//! Log and symptom-history stores
//!
//! Persistence is an external collaborator; these traits describe what the
//! engine needs from it. The in-memory implementations back the CLI and tests.

use crate::error::EngineError;
use crate::types::{LifestyleLog, SymptomCheck};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Daily lifestyle logs, unique per user and date
pub trait LogStore: Send + Sync {
    /// Insert the log, replacing any existing log for the same date
    fn upsert_log(&self, user: Uuid, log: LifestyleLog) -> Result<(), EngineError>;

    /// Up to `limit` logs, most recent date first
    fn list_logs(&self, user: Uuid, limit: usize) -> Result<Vec<LifestyleLog>, EngineError>;
}

/// Append-only record of symptom checks
pub trait SymptomHistoryStore: Send + Sync {
    fn append_check(&self, user: Uuid, check: SymptomCheck) -> Result<(), EngineError>;

    /// Up to `limit` checks, most recent first
    fn list_checks(&self, user: Uuid, limit: usize) -> Result<Vec<SymptomCheck>, EngineError>;
}

fn poisoned(what: &str) -> EngineError {
    EngineError::StoreError(format!("{} lock poisoned", what))
}

#[derive(Debug, Default)]
pub struct MemoryLogStore {
    logs: RwLock<HashMap<Uuid, Vec<LifestyleLog>>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStore for MemoryLogStore {
    fn upsert_log(&self, user: Uuid, log: LifestyleLog) -> Result<(), EngineError> {
        let mut logs = self.logs.write().map_err(|_| poisoned("log store"))?;
        let entries = logs.entry(user).or_default();

        let date = log.date;
        match entries.iter_mut().find(|l| l.date == date) {
            Some(existing) => {
                *existing = log;
                tracing::info!(user = %user, %date, "updated lifestyle log");
            }
            None => {
                entries.push(log);
                tracing::info!(user = %user, %date, "inserted lifestyle log");
            }
        }
        Ok(())
    }

    fn list_logs(&self, user: Uuid, limit: usize) -> Result<Vec<LifestyleLog>, EngineError> {
        let logs = self.logs.read().map_err(|_| poisoned("log store"))?;
        let mut entries = logs.get(&user).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[derive(Debug, Default)]
pub struct MemorySymptomHistory {
    checks: RwLock<HashMap<Uuid, Vec<SymptomCheck>>>,
}

impl MemorySymptomHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymptomHistoryStore for MemorySymptomHistory {
    fn append_check(&self, user: Uuid, check: SymptomCheck) -> Result<(), EngineError> {
        if check.symptoms.is_empty() {
            return Err(EngineError::EmptySymptomSet);
        }
        let mut checks = self.checks.write().map_err(|_| poisoned("symptom history"))?;
        tracing::info!(user = %user, check = %check.id, "recorded symptom check");
        checks.entry(user).or_default().push(check);
        Ok(())
    }

    fn list_checks(&self, user: Uuid, limit: usize) -> Result<Vec<SymptomCheck>, EngineError> {
        let checks = self.checks.read().map_err(|_| poisoned("symptom history"))?;
        let mut entries = checks.get(&user).cloned().unwrap_or_default();
        // Equal timestamps list the later append first
        entries.reverse();
        entries.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        entries.truncate(limit);
        Ok(entries)
    }
}
