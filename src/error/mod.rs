//! Error handling for gsctl.
//!
//! - **Error Categories**: High-level classification for retry decisions
//! - **Start errors**: Every failure mode of a server start
//!
//! | Error | Category | Retryable |
//! |-------|----------|-----------|
//! | Transport (connect, timeout, reset) | Network | Yes |
//! | Transport (HTTP 401) | Auth | No |
//! | Transport (HTTP 4xx) | Client | No |
//! | Transport (HTTP 5xx) | Server | Yes |
//! | StreamTerminatedEarly | Network | Yes |
//! | ServerReported / MissingBody | Server | Yes |
//! | Cancelled | User | No |

mod category;
mod stream;

pub use category::ErrorCategory;
pub use stream::{StartError, STREAM_ENDED_EARLY};

/// Result of a single server start: the ports it listens on.
pub type StartOutcome = Result<Vec<u16>, StartError>;
