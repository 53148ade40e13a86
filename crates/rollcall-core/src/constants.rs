//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// HTTP client configuration
pub mod http {
    use super::*;

    /// Connection timeout for attendance fetches
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Total timeout for one attendance fetch
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

    /// Per-account budget during friend aggregation
    pub const FRIEND_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Default relay endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://attendance-4dtj.onrender.com/api/attendance";
}

/// Aggregation configuration
pub mod aggregate {
    /// Maximum in-flight friend fetches
    pub const MAX_CONCURRENCY: usize = 8;
}

/// Storage configuration
pub mod storage {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".rollcall";

    /// Primary session file (credentials + cached snapshot)
    pub const SESSION_FILE: &str = "session.json";

    /// Tracked accounts file
    pub const FRIENDS_FILE: &str = "friends.json";
}

/// Attendance thresholds
pub mod attendance {
    /// Minimum required attendance percentage
    pub const REQUIRED_PERCENTAGE: f64 = 75.0;
}
