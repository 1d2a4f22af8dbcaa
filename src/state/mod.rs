//! Dashboard state
//!
//! Folds start outcomes and pushed [`BackendMessage`]s into per-server views:
//! pending starts, image pull progress, resource metrics, console logs and
//! lifecycle status.

pub mod logs;
pub mod metrics;
pub mod pending;
pub mod pull;

pub use logs::{LogLine, LogStore};
pub use metrics::{MetricsSample, MetricsStore};
pub use pending::{PendingUpdate, PendingUpdates, StartResult};
pub use pull::{LayerProgress, PullProgressStore};

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::StartOutcome;
use crate::events::{BackendMessage, ServerStatus};

/// Per-server view built from start outcomes and pushed backend messages.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub pending: PendingUpdates,
    pub pull: PullProgressStore,
    pub metrics: MetricsStore,
    pub logs: LogStore,
    statuses: HashMap<String, ServerStatus>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            logs: LogStore::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Record that a start is in flight for `server`.
    pub fn start_requested(&mut self, server: &str, op: Uuid) {
        self.pending.await_pending_update(server, op);
        self.pull.clear(server);
        self.statuses.insert(server.to_string(), ServerStatus::Starting);
    }

    /// Apply the settled outcome of start `op`.
    ///
    /// Returns `None` when `op` was superseded or cancelled.
    pub fn start_finished(
        &mut self,
        server: &str,
        op: Uuid,
        outcome: &StartOutcome,
    ) -> Option<StartResult> {
        let result = self.pending.resolve(server, op, outcome)?;
        self.pull.clear(server);
        let status = match result {
            StartResult::Running { .. } => ServerStatus::Running,
            StartResult::Failed { .. } => ServerStatus::Stopped,
        };
        self.statuses.insert(server.to_string(), status);
        Some(result)
    }

    /// Fold one pushed message into the view.
    pub fn apply(&mut self, message: BackendMessage) {
        match message {
            BackendMessage::Log {
                server,
                line,
                timestamp,
            } => {
                self.logs.push(
                    &server,
                    LogLine {
                        at: timestamp.unwrap_or_else(Utc::now),
                        text: line,
                    },
                );
            }
            BackendMessage::Metrics {
                server,
                cpu_percent,
                memory_bytes,
                memory_limit_bytes,
                timestamp,
            } => {
                self.metrics.apply(
                    &server,
                    MetricsSample {
                        cpu_percent,
                        memory_bytes,
                        memory_limit_bytes,
                        at: timestamp.unwrap_or_else(Utc::now),
                    },
                );
            }
            BackendMessage::PullProgress {
                server,
                layer,
                status,
                current,
                total,
            } => {
                self.pull.apply(
                    &server,
                    LayerProgress {
                        layer,
                        status,
                        current,
                        total,
                    },
                );
            }
            BackendMessage::ServerStatus { server, status } => {
                debug!(server = %server, ?status, "Server status changed");
                match status {
                    ServerStatus::Running => self.pull.clear(&server),
                    ServerStatus::Stopped => {
                        self.pull.clear(&server);
                        self.metrics.remove(&server);
                    }
                    _ => {}
                }
                self.statuses.insert(server, status);
            }
        }
    }

    pub fn status(&self, server: &str) -> Option<ServerStatus> {
        self.statuses.get(server).copied()
    }
}
