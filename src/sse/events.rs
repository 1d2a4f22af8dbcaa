//! Start-stream frame types.
//!
//! Each line of the start stream carries one JSON object tagged by `type`:
//!
//! ```text
//! data: {"type":"HEARTBEAT"}
//! data: {"type":"DONE","ports":[25565,25575]}
//! data: {"type":"ERROR","message":"image pull failed"}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded event from the start stream.
///
/// The payload is tied to the tag: `ports` only exists on `Done`, `message`
/// only on `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventFrame {
    /// Keepalive while the server is being prepared
    Heartbeat,
    /// Server is up; ports are reported in the order the backend sent them
    Done { ports: Vec<u16> },
    /// Backend gave up starting the server
    Error { message: String },
}

impl EventFrame {
    /// Short tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            EventFrame::Heartbeat => "HEARTBEAT",
            EventFrame::Done { .. } => "DONE",
            EventFrame::Error { .. } => "ERROR",
        }
    }

    /// DONE and ERROR end the start sequence.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventFrame::Heartbeat)
    }
}

/// A line that could not be turned into an [`EventFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The payload after the prefix is not a valid frame object.
    Malformed { line: String, message: String },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Malformed { line, message } => {
                write!(f, "Malformed frame '{}': {}", line, message)
            }
        }
    }
}

impl std::error::Error for FrameError {}
