//! Server start sequence.
//!
//! - `controller` - Synchronous state machine plus the async read loop
//! - `handle` - Spawned start operation with independent await/cancel

mod controller;
mod handle;

pub use controller::{ReadStep, StartController, StartPhase};
pub use handle::{StartCanceller, StartHandle};
