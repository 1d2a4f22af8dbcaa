//! Messages pushed by the panel over its event channel.
//!
//! The transport (WebSocket subscription) lives outside this crate; callers
//! hand each received text frame to [`parse_backend_message`] and apply the
//! result to [`DashboardState`](crate::state::DashboardState).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status reported for a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Starting,
    Running,
    Stopping,
    Stopped,
    #[serde(other)]
    Unknown,
}

/// One pushed message from the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendMessage {
    /// A console line from the server container
    Log {
        server: String,
        line: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Resource usage sample
    Metrics {
        server: String,
        cpu_percent: f64,
        memory_bytes: u64,
        #[serde(default)]
        memory_limit_bytes: Option<u64>,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Docker image pull progress for one layer
    PullProgress {
        server: String,
        layer: String,
        status: String,
        #[serde(default)]
        current: Option<u64>,
        #[serde(default)]
        total: Option<u64>,
    },
    /// Lifecycle change
    ServerStatus {
        server: String,
        status: ServerStatus,
    },
}

impl BackendMessage {
    /// Server the message is about.
    pub fn server(&self) -> &str {
        match self {
            BackendMessage::Log { server, .. }
            | BackendMessage::Metrics { server, .. }
            | BackendMessage::PullProgress { server, .. }
            | BackendMessage::ServerStatus { server, .. } => server,
        }
    }
}

/// Parse one pushed text frame.
pub fn parse_backend_message(text: &str) -> Result<BackendMessage, serde_json::Error> {
    serde_json::from_str(text)
}
