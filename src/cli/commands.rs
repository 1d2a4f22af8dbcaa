//! Start and stop commands.

use std::future::Future;

use tracing::{info, warn};

use crate::auth::AuthContext;
use crate::backend::BackendClient;
use crate::error::{StartError, StartOutcome};
use crate::state::DashboardState;
use crate::traits::{HttpClient, HttpError};

/// Start `name` and wait until it settles or `interrupt` resolves.
///
/// The pending entry in `state` is recorded before the stream is read and
/// resolved with whatever the start settles to. Resolving `interrupt` first
/// abandons the read and yields [`StartError::Cancelled`].
pub async fn run_start<C, F>(
    client: &BackendClient<C>,
    auth: &AuthContext,
    name: &str,
    state: &mut DashboardState,
    interrupt: F,
) -> StartOutcome
where
    C: HttpClient,
    F: Future<Output = ()>,
{
    let handle = client.start_server(name, auth).await?;
    let op = handle.id();
    state.start_requested(name, op);

    let outcome = tokio::select! {
        outcome = handle.outcome() => outcome,
        _ = interrupt => {
            warn!(server = name, %op, "Start interrupted");
            Err(StartError::Cancelled)
        }
    };

    state.start_finished(name, op, &outcome);
    outcome
}

/// Stop `name`.
pub async fn run_stop<C: HttpClient>(
    client: &BackendClient<C>,
    auth: &AuthContext,
    name: &str,
) -> Result<(), HttpError> {
    client.stop_server(name, auth).await?;
    info!(server = name, "Stop accepted");
    Ok(())
}

/// Human-readable port list, e.g. `25565, 25575`.
pub fn format_ports(ports: &[u16]) -> String {
    if ports.is_empty() {
        return "no ports published".to_string();
    }
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
