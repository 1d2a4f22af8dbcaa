//! CLI module for gsctl.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Start and stop commands against the panel
//!
//! # Usage
//!
//! ```ignore
//! use gsctl::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Start { name } => { /* run_start(...) */ }
//!     CliCommand::Stop { name } => { /* run_stop(...) */ }
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::{format_ports, run_start, run_stop};
pub use version::{version_line, VERSION};
