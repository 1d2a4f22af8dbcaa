//! Pending server starts.
//!
//! One entry per server while a start is in flight. A newer start for the
//! same server replaces the older entry, and only the operation that owns the
//! current entry may resolve it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StartError, StartOutcome};

/// A start waiting for its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub op: Uuid,
    pub since: DateTime<Utc>,
}

/// Last settled result of a start, kept per server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartResult {
    Running { ports: Vec<u16> },
    Failed { reason: String },
}

impl StartResult {
    pub fn from_outcome(outcome: &StartOutcome) -> Self {
        match outcome {
            Ok(ports) => StartResult::Running {
                ports: ports.clone(),
            },
            Err(e) => StartResult::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Pending starts per server and the last settled result of each.
#[derive(Debug, Default)]
pub struct PendingUpdates {
    pending: HashMap<String, PendingUpdate>,
    results: HashMap<String, StartResult>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `server` as starting under operation `op`.
    ///
    /// Returns the entry it replaced, if any.
    pub fn await_pending_update(&mut self, server: &str, op: Uuid) -> Option<PendingUpdate> {
        let replaced = self.pending.insert(
            server.to_string(),
            PendingUpdate {
                op,
                since: Utc::now(),
            },
        );
        if let Some(old) = &replaced {
            debug!(server, old_op = %old.op, new_op = %op, "Superseding pending start");
        }
        replaced
    }

    /// Record the outcome of operation `op`.
    ///
    /// Ignored (returns `None`) when `op` no longer owns the pending entry.
    /// A cancelled start clears its entry without recording a result.
    pub fn resolve(&mut self, server: &str, op: Uuid, outcome: &StartOutcome) -> Option<StartResult> {
        match self.pending.get(server) {
            Some(entry) if entry.op == op => {}
            _ => {
                debug!(server, %op, "Ignoring outcome of superseded start");
                return None;
            }
        }
        self.pending.remove(server);

        if matches!(outcome, Err(StartError::Cancelled)) {
            return None;
        }

        let result = StartResult::from_outcome(outcome);
        self.results.insert(server.to_string(), result.clone());
        Some(result)
    }

    pub fn is_pending(&self, server: &str) -> bool {
        self.pending.contains_key(server)
    }

    pub fn pending(&self, server: &str) -> Option<&PendingUpdate> {
        self.pending.get(server)
    }

    pub fn last_result(&self, server: &str) -> Option<&StartResult> {
        self.results.get(server)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
