//! Primary session storage
//!
//! Stores the primary user's roll/password alongside the last successfully
//! fetched snapshot and its capture time, in one JSON file. Created on
//! first login, overwritten on every successful refresh, destroyed
//! together on logout.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::model::AttendanceSnapshot;
use crate::paths;

use super::write_json_atomic;

/// Roll/password pair for the record service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub roll: String,
    pub password: String,
}

/// Last fetched snapshot with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPayload {
    pub snapshot: AttendanceSnapshot,
    pub captured_at: DateTime<Utc>,
}

impl CachedPayload {
    /// Whole hours elapsed since capture (floored, never negative)
    pub fn age_hours(&self, now: DateTime<Utc>) -> i64 {
        (now - self.captured_at).num_hours().max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    credentials: Credentials,
    cache: CachedPayload,
}

/// Store for the primary session (credentials + cached snapshot)
///
/// Constructed with an explicit path; callers share one logical owner per
/// session rather than going through a global.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the default location (`~/.rollcall/session.json`)
    pub fn new() -> Self {
        Self::at_path(paths::session_file())
    }

    /// Store at a specific path
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved session, if any
    pub fn load(&self) -> Result<Option<(Credentials, CachedPayload)>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let record: SessionRecord = serde_json::from_str(&contents)?;
        Ok(Some((record.credentials, record.cache)))
    }

    /// Save credentials and cache together, atomically
    pub fn save(&self, credentials: &Credentials, cache: &CachedPayload) -> Result<(), StoreError> {
        let record = SessionRecord {
            credentials: credentials.clone(),
            cache: cache.clone(),
        };
        write_json_atomic(&self.path, &record)?;
        debug!(roll = %credentials.roll, "Session saved");
        Ok(())
    }

    /// Remove the saved session (logout)
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        debug!("Session cleared");
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_snapshot() -> AttendanceSnapshot {
        serde_json::from_str(
            r#"{
                "roll_number": "21BCS001",
                "total_info": {"total_attended": 42, "total_held": 50, "total_percentage": 84},
                "subjectwise_summary": [
                    {"subject_name": "Maths", "percentage": 84, "attended_held": "42/50"}
                ],
                "attendance_summary": [{"subject": "Maths", "attendance_today": "PP"}]
            }"#,
        )
        .unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::at_path(dir.path().join("session.json"))
    }

    #[test]
    fn test_load_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let credentials = Credentials {
            roll: "21BCS001".into(),
            password: "hunter2".into(),
        };
        let cache = CachedPayload {
            snapshot: sample_snapshot(),
            captured_at: Utc::now(),
        };

        store.save(&credentials, &cache).unwrap();
        let (loaded_credentials, loaded_cache) = store.load().unwrap().unwrap();
        assert_eq!(loaded_credentials, credentials);
        assert_eq!(loaded_cache.snapshot, cache.snapshot);
        assert_eq!(loaded_cache.captured_at, cache.captured_at);
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let credentials = Credentials {
            roll: "r".into(),
            password: "p".into(),
        };
        let cache = CachedPayload {
            snapshot: sample_snapshot(),
            captured_at: Utc::now(),
        };
        store.save(&credentials, &cache).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing an already-empty store is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_age_hours_floors() {
        let now = Utc::now();
        let cache = CachedPayload {
            snapshot: sample_snapshot(),
            captured_at: now - Duration::hours(2) - Duration::minutes(59),
        };
        assert_eq!(cache.age_hours(now), 2);

        let fresh = CachedPayload {
            snapshot: sample_snapshot(),
            captured_at: now,
        };
        assert_eq!(fresh.age_hours(now), 0);
    }

    #[test]
    fn test_age_hours_never_negative() {
        let now = Utc::now();
        let cache = CachedPayload {
            snapshot: sample_snapshot(),
            captured_at: now + Duration::hours(1),
        };
        assert_eq!(cache.age_hours(now), 0);
    }
}
