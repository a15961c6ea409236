//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimerSnapshot, TimerView};

/// Timer values as returned over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerBody {
    pub formatted_time: String,
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u64>,
}

impl From<TimerSnapshot> for TimerBody {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            formatted_time: snapshot.formatted_time(),
            is_running: snapshot.is_running(),
            elapsed_seconds: Some(snapshot.elapsed_seconds),
        }
    }
}

impl From<TimerView> for TimerBody {
    fn from(view: TimerView) -> Self {
        Self {
            formatted_time: view.formatted_time,
            is_running: view.is_running,
            elapsed_seconds: None,
        }
    }
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerBody,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerBody) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response describing the timer after a command took effect
    pub fn from_snapshot(message: String, snapshot: TimerSnapshot) -> Self {
        let status = if snapshot.is_running() { "running" } else { "stopped" };
        Self::new(status, message, snapshot.into())
    }

    /// Response for a command that was not recognised
    pub fn ignored(message: String, view: TimerView) -> Self {
        Self::new("ignored", message, view.into())
    }
}

/// Body of `POST /timer/command`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// Enhanced status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerBody,
    pub bound_observers: usize,
    pub vital_entries: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Result of clearing the vitals store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
