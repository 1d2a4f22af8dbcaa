//! Command-line argument parsing for gsctl.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Start a game server and wait for its ports
    Start { name: String },
    /// Stop a game server
    Stop { name: String },
    /// Show version information
    Version,
    /// Show usage (default)
    Help,
    /// Arguments could not be understood
    Invalid { reason: String },
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use gsctl::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["gsctl".to_string(), "start".to_string(), "mc".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Start { name: "mc".to_string() }
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);

    let Some(first) = args.next() else {
        return CliCommand::Help;
    };

    match first.as_str() {
        "--version" | "-V" | "version" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "start" | "stop" => {
            let name = match args.next() {
                Some(name) if !name.trim().is_empty() => name,
                _ => {
                    return CliCommand::Invalid {
                        reason: format!("'{}' requires a server name", first),
                    }
                }
            };
            if let Some(extra) = args.next() {
                return CliCommand::Invalid {
                    reason: format!("unexpected argument '{}'", extra),
                };
            }
            if first == "start" {
                CliCommand::Start { name }
            } else {
                CliCommand::Stop { name }
            }
        }
        other => CliCommand::Invalid {
            reason: format!("unknown command '{}'", other),
        },
    }
}

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: gsctl <command>

Commands:
  start <name>    Start a game server and wait until it is running
  stop <name>     Stop a game server
  version         Print version
  help            Print this help

Environment:
  GSCTL_BASE_URL               Panel backend URL
  GSCTL_TOKEN                  Bearer token
  GSCTL_CONNECT_TIMEOUT_SECS   Connection timeout in seconds
  RUST_LOG                     Log filter (default: gsctl=info)";
