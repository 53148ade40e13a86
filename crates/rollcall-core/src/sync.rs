//! Primary sync engine
//!
//! One fetch per call, no internal retry - a fresh `sync` must be issued
//! externally to try again. A failed fetch falls back to the persisted
//! cache instead of blanking a display that has usable data; only a
//! successful fetch mutates the store.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::model::AttendanceSnapshot;
use crate::remote::AttendanceService;
use crate::storage::{CachedPayload, CredentialStore, Credentials};

/// Result of one sync attempt
#[derive(Debug)]
pub enum SyncOutcome {
    /// Fresh fetch succeeded and was persisted
    Success(AttendanceSnapshot),
    /// Fetch failed but a cached snapshot is available
    Fallback {
        snapshot: AttendanceSnapshot,
        /// Whole hours since the cache was captured
        age_hours: i64,
        message: String,
    },
    /// Fetch failed and no cache exists
    Failure(String),
}

/// Orchestrates the primary fetch, cache persistence, and fallback.
///
/// Callers validate roll/password non-emptiness before invoking `sync`;
/// overlapping calls against the same store are the caller's to serialize.
pub struct SyncEngine<S> {
    service: S,
    store: CredentialStore,
}

impl<S: AttendanceService> SyncEngine<S> {
    pub fn new(service: S, store: CredentialStore) -> Self {
        Self { service, store }
    }

    /// Fetch a fresh snapshot for the primary user.
    ///
    /// Never propagates an error past this boundary; always resolves to
    /// one of the three outcomes.
    pub async fn sync(&self, roll: &str, password: &str) -> SyncOutcome {
        match self.service.fetch(roll, password).await {
            Ok(snapshot) => {
                let credentials = Credentials {
                    roll: roll.to_string(),
                    password: password.to_string(),
                };
                let cache = CachedPayload {
                    snapshot: snapshot.clone(),
                    captured_at: Utc::now(),
                };
                if let Err(e) = self.store.save(&credentials, &cache) {
                    // Fresh data is still served; the next refresh retries the write
                    warn!("Failed to persist snapshot: {}", e);
                }
                info!(roll = %roll, "Sync succeeded");
                SyncOutcome::Success(snapshot)
            }
            Err(err) => self.fall_back(roll, &err),
        }
    }

    /// Cached snapshot and its age, for optimistic display on startup
    /// before the refresh lands
    pub fn cached(&self) -> Option<(Credentials, AttendanceSnapshot, i64)> {
        let (credentials, cache) = self.store.load().ok().flatten()?;
        let age_hours = cache.age_hours(Utc::now());
        Some((credentials, cache.snapshot, age_hours))
    }

    fn fall_back(&self, roll: &str, err: &FetchError) -> SyncOutcome {
        warn!(roll = %roll, error = %err, "Fetch failed, trying cache");
        match self.store.load() {
            Ok(Some((_, cache))) => {
                let age_hours = cache.age_hours(Utc::now());
                debug!(age_hours, "Serving cached snapshot");
                SyncOutcome::Fallback {
                    snapshot: cache.snapshot,
                    age_hours,
                    message: format!(
                        "Using cached data ({} hours old) - check connection and refresh",
                        age_hours
                    ),
                }
            }
            Ok(None) => SyncOutcome::Failure(err.to_string()),
            Err(store_err) => {
                warn!("Cache read failed: {}", store_err);
                SyncOutcome::Failure(err.to_string())
            }
        }
    }
}
