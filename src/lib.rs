//! gsctl - game server panel client
//!
//! Starts and stops game servers through the panel API, decodes the
//! Server-Sent Events start stream and keeps a per-server dashboard view.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod sse;
pub mod start;
pub mod state;
pub mod traits;
