//! Start-stream error types.
//!
//! Every way a server start can end other than success. Malformed frames
//! appear here for completeness but are only ever logged by the decoder; they
//! never become the outcome of a start.

use std::fmt;

use super::category::ErrorCategory;
use crate::sse::FrameError;
use crate::traits::HttpError;

/// Reason text for a stream that closed without DONE or ERROR.
pub const STREAM_ENDED_EARLY: &str = "stream ended before completion or error";

/// Failure of a server start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// A line failed to parse as a frame.
    MalformedFrame(FrameError),

    /// The stream closed before a DONE or ERROR frame.
    StreamTerminatedEarly,

    /// The backend sent an ERROR frame.
    ServerReported { message: String },

    /// Opening or reading the stream failed.
    Transport(HttpError),

    /// The start response had no body to read.
    MissingBody,

    /// The caller cancelled the start before it settled.
    Cancelled,

    /// The task driving the stream panicked or was aborted.
    TaskFailed { message: String },
}

impl StartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StartError::Transport(err) => match err.status() {
                Some(401) => ErrorCategory::Auth,
                Some(status) if status < 500 => ErrorCategory::Client,
                Some(_) => ErrorCategory::Server,
                None if matches!(err, HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
                None => ErrorCategory::Network,
            },
            StartError::StreamTerminatedEarly => ErrorCategory::Network,
            StartError::ServerReported { .. } | StartError::MissingBody => ErrorCategory::Server,
            StartError::MalformedFrame(_) | StartError::TaskFailed { .. } => ErrorCategory::Client,
            StartError::Cancelled => ErrorCategory::User,
        }
    }

    /// Check if retrying the start could help.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Check if the bearer token was rejected.
    pub fn requires_reauth(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StartError::MalformedFrame(_) => {
                "Received invalid progress data from the panel.".to_string()
            }
            StartError::StreamTerminatedEarly => {
                "The panel closed the start stream before the server finished starting.".to_string()
            }
            StartError::ServerReported { message } => {
                format!("The server failed to start: {}", message)
            }
            StartError::Transport(HttpError::ServerError { status: 401, .. }) => {
                "The panel rejected the access token.".to_string()
            }
            StartError::Transport(err) => format!("Could not reach the panel: {}", err),
            StartError::MissingBody => "The panel returned an empty start response.".to_string(),
            StartError::Cancelled => "The start was cancelled.".to_string(),
            StartError::TaskFailed { .. } => "The start was interrupted unexpectedly.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StartError::MalformedFrame(_) => "E_START_FRAME",
            StartError::StreamTerminatedEarly => "E_START_EARLY_EOF",
            StartError::ServerReported { .. } => "E_START_SERVER",
            StartError::Transport(_) => "E_START_TRANSPORT",
            StartError::MissingBody => "E_START_NO_BODY",
            StartError::Cancelled => "E_START_CANCELLED",
            StartError::TaskFailed { .. } => "E_START_TASK",
        }
    }
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::MalformedFrame(err) => write!(f, "{}", err),
            StartError::StreamTerminatedEarly => write!(f, "{}", STREAM_ENDED_EARLY),
            StartError::ServerReported { message } => write!(f, "{}", message),
            StartError::Transport(err) => write!(f, "Transport failure: {}", err),
            StartError::MissingBody => write!(f, "Start response has no body"),
            StartError::Cancelled => write!(f, "Start cancelled"),
            StartError::TaskFailed { message } => write!(f, "Start task failed: {}", message),
        }
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartError::MalformedFrame(err) => Some(err),
            StartError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HttpError> for StartError {
    fn from(err: HttpError) -> Self {
        StartError::Transport(err)
    }
}

impl From<FrameError> for StartError {
    fn from(err: FrameError) -> Self {
        StartError::MalformedFrame(err)
    }
}
