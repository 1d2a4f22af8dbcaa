//! Docker image pull progress, one entry per layer.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerProgress {
    pub layer: String,
    pub status: String,
    pub current: Option<u64>,
    pub total: Option<u64>,
}

/// Latest progress per server and layer.
///
/// Layers keep the order in which they were first reported; an update for a
/// known layer replaces it in place.
#[derive(Debug, Default)]
pub struct PullProgressStore {
    servers: HashMap<String, Vec<LayerProgress>>,
}

impl PullProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, server: &str, progress: LayerProgress) {
        let layers = self.servers.entry(server.to_string()).or_default();
        match layers.iter_mut().find(|l| l.layer == progress.layer) {
            Some(existing) => *existing = progress,
            None => layers.push(progress),
        }
    }

    pub fn layers(&self, server: &str) -> &[LayerProgress] {
        self.servers.get(server).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fraction of bytes pulled over the layers that report a size.
    pub fn overall(&self, server: &str) -> Option<f64> {
        let (current, total) = self
            .layers(server)
            .iter()
            .filter_map(|l| match l.total {
                Some(total) if total > 0 => Some((l.current.unwrap_or(0).min(total), total)),
                _ => None,
            })
            .fold((0u64, 0u64), |(c, t), (lc, lt)| (c + lc, t + lt));

        if total == 0 {
            None
        } else {
            Some(current as f64 / total as f64)
        }
    }

    pub fn clear(&mut self, server: &str) {
        self.servers.remove(server);
    }
}
