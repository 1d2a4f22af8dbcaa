//! Version command for gsctl.

/// The current version of gsctl, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version line printed by `--version`.
pub fn version_line() -> String {
    format!("gsctl {}", VERSION)
}
