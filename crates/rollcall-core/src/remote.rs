//! Remote attendance service client
//!
//! The relay forwards `student_id`/`password` to the record service
//! unchanged and returns either a snapshot body or an `{"error": ...}`
//! body. A success status carrying an error field is still a failure -
//! invalid credentials arrive that way.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants;
use crate::error::FetchError;
use crate::model::AttendanceSnapshot;

/// One-request-per-call attendance source
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Fetch the snapshot for one roll/password pair
    async fn fetch(&self, roll: &str, secret: &str) -> Result<AttendanceSnapshot, FetchError>;
}

/// HTTP client for the attendance relay
pub struct AttendanceClient {
    http: Client,
    endpoint: String,
}

impl AttendanceClient {
    /// Create a client against the default relay endpoint
    pub fn new() -> Self {
        Self::with_endpoint(constants::http::DEFAULT_ENDPOINT)
    }

    /// Create a client against a specific endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(concat!("rollcall/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(constants::http::CONNECT_TIMEOUT)
            .timeout(constants::http::FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client: {}. Using default client.", e);
                Client::new()
            });
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for AttendanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttendanceService for AttendanceClient {
    async fn fetch(&self, roll: &str, secret: &str) -> Result<AttendanceSnapshot, FetchError> {
        debug!(roll = %roll, "Fetching attendance");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("student_id", roll), ("password", secret)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(roll = %roll, status = %status, "Attendance fetch failed");
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
            warn!(roll = %roll, error = %message, "Upstream reported an error");
            return Err(FetchError::Upstream(message.to_string()));
        }

        let snapshot: AttendanceSnapshot = serde_json::from_value(body)?;
        debug!(
            roll = %roll,
            subjects = snapshot.subjectwise_summary.len(),
            "Snapshot received"
        );
        Ok(snapshot)
    }
}
