//! Rollcall Core - attendance sync, caching, and friend aggregation
//!
//! This crate provides the core functionality for the Rollcall CLI:
//! - Remote attendance client for the record-service relay
//! - Primary session storage with an offline cache and staleness reporting
//! - Tracked-account ("friends") registry with obfuscated secrets
//! - Concurrent per-friend percentage aggregation tolerant of partial failure

pub mod aggregate;
pub mod constants;
pub mod error;
pub mod model;
pub mod paths;
pub mod remote;
pub mod storage;
pub mod sync;

// Re-exports for convenience
pub use aggregate::{AggregationEngine, FriendPercentage};
pub use model::{AttendanceSnapshot, SessionStatus};
pub use remote::{AttendanceClient, AttendanceService};
pub use storage::{CredentialStore, FriendRegistry, TrackedAccount};
pub use sync::{SyncEngine, SyncOutcome};
