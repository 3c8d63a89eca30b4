//! Persisted cooldown marker
//!
//! The only alert state that outlives a session is the timestamp of the last
//! successful send, keyed per user.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Storage for the last-sent timestamp of each user
pub trait CooldownStore: Send + Sync {
    fn load(&self, user: Uuid) -> Result<Option<DateTime<Utc>>, EngineError>;
    fn save(&self, user: Uuid, sent_at: DateTime<Utc>) -> Result<(), EngineError>;
}

/// Process-local marker store
#[derive(Debug, Default)]
pub struct MemoryCooldownStore {
    markers: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl MemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CooldownStore for MemoryCooldownStore {
    fn load(&self, user: Uuid) -> Result<Option<DateTime<Utc>>, EngineError> {
        let markers = self
            .markers
            .lock()
            .map_err(|_| EngineError::PersistenceError("cooldown store poisoned".to_string()))?;
        Ok(markers.get(&user).copied())
    }

    fn save(&self, user: Uuid, sent_at: DateTime<Utc>) -> Result<(), EngineError> {
        let mut markers = self
            .markers
            .lock()
            .map_err(|_| EngineError::PersistenceError("cooldown store poisoned".to_string()))?;
        markers.insert(user, sent_at);
        Ok(())
    }
}

/// Markers kept as a JSON object `{ "<user uuid>": "<rfc3339>" }` on disk.
///
/// A missing file reads as "never sent". Every save writes a sibling temp
/// file and renames it over the old one, so readers see either the previous
/// or the new markers.
#[derive(Debug)]
pub struct JsonFileCooldownStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileCooldownStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_all(&self) -> Result<HashMap<Uuid, DateTime<Utc>>, EngineError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            EngineError::PersistenceError(format!(
                "failed to parse cooldown file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl CooldownStore for JsonFileCooldownStore {
    fn load(&self, user: Uuid) -> Result<Option<DateTime<Utc>>, EngineError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| EngineError::PersistenceError("cooldown file lock poisoned".to_string()))?;
        Ok(self.read_all()?.get(&user).copied())
    }

    fn save(&self, user: Uuid, sent_at: DateTime<Utc>) -> Result<(), EngineError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| EngineError::PersistenceError("cooldown file lock poisoned".to_string()))?;

        let mut markers = self.read_all()?;
        markers.insert(user, sent_at);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&markers)?;
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(user = %user, path = %self.path.display(), "saved alert cooldown marker");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sent_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 18, 45, 0).unwrap()
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCooldownStore::new();
        let user = Uuid::new_v4();

        assert_eq!(store.load(user).unwrap(), None);
        store.save(user, sent_at()).unwrap();
        assert_eq!(store.load(user).unwrap(), Some(sent_at()));
        assert_eq!(store.load(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cooldown.json");
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        let store = JsonFileCooldownStore::new(&path);
        assert_eq!(store.load(user).unwrap(), None);
        store.save(user, sent_at()).unwrap();
        store.save(other, sent_at() + chrono::Duration::hours(1)).unwrap();

        let reopened = JsonFileCooldownStore::new(&path);
        assert_eq!(reopened.load(user).unwrap(), Some(sent_at()));
        assert_eq!(
            reopened.load(other).unwrap(),
            Some(sent_at() + chrono::Duration::hours(1))
        );
    }

    #[test]
    fn test_file_store_ignores_interrupted_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldown.json");
        let user = Uuid::new_v4();

        let store = JsonFileCooldownStore::new(&path);
        store.save(user, sent_at()).unwrap();
        assert!(!dir.path().join("cooldown.json.tmp").exists());

        // A crash mid-save leaves only a truncated temp file behind
        fs::write(dir.path().join("cooldown.json.tmp"), "{\"trunc").unwrap();
        let reopened = JsonFileCooldownStore::new(&path);
        assert_eq!(reopened.load(user).unwrap(), Some(sent_at()));

        let later = sent_at() + chrono::Duration::hours(30);
        reopened.save(user, later).unwrap();
        assert_eq!(reopened.load(user).unwrap(), Some(later));
        assert!(!dir.path().join("cooldown.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldown.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileCooldownStore::new(&path);
        assert!(matches!(
            store.load(Uuid::new_v4()),
            Err(EngineError::PersistenceError(_))
        ));
    }
}
