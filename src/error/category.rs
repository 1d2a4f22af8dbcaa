//! Error category classification.
//!
//! Categories give callers one place to decide whether a failed start is
//! worth retrying and what to tell the operator.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection drops, DNS failures, timeouts.
    Network,

    /// Missing, expired or rejected bearer token.
    Auth,

    /// The backend refused or failed the operation.
    Server,

    /// The client itself misbehaved (task panic, protocol misuse).
    Client,

    /// The operator stopped the operation.
    User,

    /// Missing or invalid settings.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check the connection to the panel and try again",
            ErrorCategory::Auth => "Refresh the access token (GSCTL_TOKEN) and try again",
            ErrorCategory::Server => "Check the server logs on the panel, then retry the start",
            ErrorCategory::Client => "This may be a bug. Please report it if it persists",
            ErrorCategory::User => "Start the server again when ready",
            ErrorCategory::Configuration => "Check GSCTL_* environment settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
