//! `fuelwatch vehicle` — start/stop/toggle the vehicle.

use serde::Serialize;

use fuelwatch_core::{Command, CommandResult, CoreError, EventKind, Monitor};

use crate::cli::{GlobalOpts, VehicleCommand};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct VehicleView {
    running: bool,
    changed: bool,
    incident: Option<String>,
}

pub async fn run(global: &GlobalOpts, command: VehicleCommand) -> Result<(), CliError> {
    let monitor_config = crate::config::resolve_monitor_config(global)?;

    let view = Monitor::oneshot(monitor_config, |monitor| async move {
        let snapshot = monitor.store().telemetry().ok_or(CoreError::NoSnapshot)?;
        let stopped = snapshot.car_status.stopped;

        // Start/stop are idempotent: no store write when already there.
        let skip = match command {
            VehicleCommand::Start => !stopped,
            VehicleCommand::Stop => stopped,
            VehicleCommand::Toggle => false,
        };
        if skip {
            return Ok(VehicleView {
                running: !stopped,
                changed: false,
                incident: None,
            });
        }

        match monitor.execute(Command::ToggleVehicle).await? {
            CommandResult::VehicleToggled { stopped, incident } => Ok(VehicleView {
                running: !stopped,
                changed: true,
                incident: incident.map(incident_name),
            }),
            other => Err(CoreError::Internal(format!(
                "unexpected toggle result: {other:?}"
            ))),
        }
    })
    .await?;

    let rendered = output::render_single(&global.output, &view, summary, summary);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn incident_name(kind: EventKind) -> String {
    match kind {
        EventKind::Theft => "fuel theft".into(),
        EventKind::Refuel => "refueling".into(),
    }
}

fn summary(view: &VehicleView) -> String {
    let state = if view.running { "running" } else { "stopped" };
    let mut text = if view.changed {
        format!("Vehicle is now {state}.")
    } else {
        format!("Vehicle is already {state}.")
    };
    if let Some(ref incident) = view.incident {
        text.push_str(&format!(" Simulated {incident} incident injected."));
    }
    text
}
