//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use fuelwatch_core::{LOCATION_FETCHING, LOCATION_RETRYING, Monitor};

use crate::error::CliError;

/// Ask for confirmation before a destructive action.
///
/// Returns `Ok(true)` when confirmed. `--yes` skips the prompt; in
/// non-interactive contexts without `--yes` the action is refused.
pub fn confirm(action: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }

    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }

    dialoguer::Confirm::new()
        .with_prompt(format!("{action}?"))
        .default(false)
        .interact()
        .map_err(|e| CliError::Config(format!("prompt failed: {e}")))
}

/// Wait for the location worker to settle on a resolved display name.
///
/// Bounded by `budget`: returns whatever is published when the budget
/// runs out, so a slow geocode service never hangs a oneshot command.
pub async fn settled_location(monitor: &Monitor, budget: Duration) -> String {
    let mut stream = monitor.store().subscribe_location();
    let deadline = tokio::time::Instant::now() + budget;

    loop {
        let current = stream.latest();
        if current != LOCATION_FETCHING && current != LOCATION_RETRYING {
            return current;
        }
        match tokio::time::timeout_at(deadline, stream.changed()).await {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return stream.latest(),
        }
    }
}
