//! Friends aggregation engine
//!
//! Fans out one fetch per tracked account and joins all outcomes. A
//! failure for one account degrades that account to Unknown; it never
//! cancels or fails the rest of the join.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::constants;
use crate::model::AttendanceSnapshot;
use crate::remote::AttendanceService;
use crate::storage::TrackedAccount;

/// Per-account aggregation outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FriendPercentage {
    Known(f64),
    /// Fetch failed, timed out, was cancelled, or carried no percentage
    Unknown,
}

impl FriendPercentage {
    pub fn known(self) -> Option<f64> {
        match self {
            Self::Known(p) => Some(p),
            Self::Unknown => None,
        }
    }
}

/// Fan-out engine for tracked accounts
pub struct AggregationEngine<S> {
    service: Arc<S>,
    max_concurrency: usize,
    per_account_timeout: Duration,
}

impl<S: AttendanceService> AggregationEngine<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            max_concurrency: constants::aggregate::MAX_CONCURRENCY,
            per_account_timeout: constants::http::FRIEND_FETCH_TIMEOUT,
        }
    }

    /// Override the per-account fetch budget
    pub fn with_per_account_timeout(mut self, budget: Duration) -> Self {
        self.per_account_timeout = budget;
        self
    }

    /// Fetch every tracked account's percentage concurrently.
    ///
    /// Completes only once every account has settled (join-all, not
    /// first-to-finish). The map is keyed by roll; iteration order carries
    /// no meaning. Cancelling the token settles unfinished accounts as
    /// Unknown so the caller can discard the map on teardown.
    pub async fn aggregate(
        &self,
        accounts: &[TrackedAccount],
        cancel: &CancellationToken,
    ) -> HashMap<String, FriendPercentage> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let budget = self.per_account_timeout;
        info!(count = accounts.len(), "Aggregating friend attendance");

        let futures: Vec<_> = accounts
            .iter()
            .map(|account| {
                let sem = semaphore.clone();
                let service = self.service.clone();
                let cancel = cancel.child_token();
                let roll = account.roll.clone();
                let secret = account.secret();

                async move {
                    let _permit = match sem.acquire().await {
                        Ok(p) => p,
                        Err(_) => return (roll, FriendPercentage::Unknown),
                    };
                    if cancel.is_cancelled() {
                        return (roll, FriendPercentage::Unknown);
                    }

                    let fetch = timeout(budget, service.fetch(&roll, &secret));
                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!(roll = %roll, "Friend fetch cancelled");
                            FriendPercentage::Unknown
                        }
                        result = fetch => match result {
                            Ok(Ok(snapshot)) => extract_percentage(&snapshot),
                            Ok(Err(e)) => {
                                warn!(roll = %roll, error = %e, "Friend fetch failed");
                                FriendPercentage::Unknown
                            }
                            Err(_) => {
                                warn!(roll = %roll, "Friend fetch timed out");
                                FriendPercentage::Unknown
                            }
                        },
                    };
                    (roll, outcome)
                }
            })
            .collect();

        let results = join_all(futures).await;
        let settled = results
            .iter()
            .filter(|(_, p)| matches!(p, FriendPercentage::Known(_)))
            .count();
        info!(total = results.len(), settled, "Aggregation complete");
        results.into_iter().collect()
    }
}

/// Extraction precedence: the first subject's percentage when the summary
/// is non-empty, else the overall total, else Unknown
pub fn extract_percentage(snapshot: &AttendanceSnapshot) -> FriendPercentage {
    if let Some(p) = snapshot
        .subjectwise_summary
        .first()
        .and_then(|s| s.percentage)
    {
        return FriendPercentage::Known(p.0);
    }
    if let Some(p) = snapshot
        .total_info
        .as_ref()
        .and_then(|t| t.total_percentage)
    {
        return FriendPercentage::Known(p.0);
    }
    FriendPercentage::Unknown
}
