//! Latest resource-usage sample per server.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSample {
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub memory_limit_bytes: Option<u64>,
    pub at: DateTime<Utc>,
}

impl MetricsSample {
    /// Memory use as a fraction of the limit, when a limit is set.
    pub fn memory_fraction(&self) -> Option<f64> {
        match self.memory_limit_bytes {
            Some(limit) if limit > 0 => Some(self.memory_bytes as f64 / limit as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MetricsStore {
    latest: HashMap<String, MetricsSample>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sample` unless a newer one is already held.
    pub fn apply(&mut self, server: &str, sample: MetricsSample) {
        match self.latest.get(server) {
            Some(existing) if existing.at > sample.at => {}
            _ => {
                self.latest.insert(server.to_string(), sample);
            }
        }
    }

    pub fn latest(&self, server: &str) -> Option<&MetricsSample> {
        self.latest.get(server)
    }

    pub fn remove(&mut self, server: &str) {
        self.latest.remove(server);
    }
}
