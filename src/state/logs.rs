//! Bounded console log buffer per server.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_LOG_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// Recent log lines per server, oldest dropped once a server hits capacity.
#[derive(Debug)]
pub struct LogStore {
    capacity: usize,
    servers: HashMap<String, VecDeque<LogLine>>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogStore {
    /// Keep at most `capacity` lines per server; oldest lines go first.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            servers: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, server: &str, line: LogLine) {
        if self.capacity == 0 {
            return;
        }
        let lines = self.servers.entry(server.to_string()).or_default();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self, server: &str) -> impl Iterator<Item = &LogLine> {
        self.servers.get(server).into_iter().flatten()
    }

    pub fn len(&self, server: &str) -> usize {
        self.servers.get(server).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self, server: &str) {
        self.servers.remove(server);
    }
}
