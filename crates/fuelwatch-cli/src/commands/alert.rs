//! `fuelwatch alert` — inspect, resolve, and monitor fuel alerts.

use serde::Serialize;

use fuelwatch_core::{Command, CommandResult, CoreError, Monitor};

use crate::cli::{AlertCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct AlertView {
    description: String,
    active: bool,
    fuel_level_difference: f64,
    monitored: bool,
    resolved: bool,
}

pub async fn run(global: &GlobalOpts, command: AlertCommand) -> Result<(), CliError> {
    let monitor_config = crate::config::resolve_monitor_config(global)?;

    match command {
        AlertCommand::Show => {
            let view = Monitor::oneshot(monitor_config, |monitor| async move {
                let alerts = monitor.store().alerts().ok_or(CoreError::NoSnapshot)?;
                Ok(AlertView {
                    description: alerts.fuel_theft.clone(),
                    active: alerts.is_active(),
                    fuel_level_difference: alerts.fuel_level_difference,
                    monitored: alerts.is_monitored,
                    resolved: alerts.is_resolved,
                })
            })
            .await?;

            let color = output::should_color(&global.color);
            let rendered = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| v.description.clone(),
            );
            output::print_output(&rendered, global.quiet);
        }

        AlertCommand::Resolve => {
            let result = Monitor::oneshot(monitor_config, |monitor| async move {
                monitor.execute(Command::ResolveAlert).await
            })
            .await?;

            let message = match result {
                CommandResult::Skipped { reason } => format!("Nothing to resolve: {reason}."),
                _ => "Alert resolved.".into(),
            };
            output::print_output(&message, global.quiet);
        }

        AlertCommand::Monitor => {
            Monitor::oneshot(monitor_config, |monitor| async move {
                monitor.execute(Command::StartMonitoring).await
            })
            .await?;
            output::print_output("Fuel monitoring enabled.", global.quiet);
        }
    }

    Ok(())
}

fn detail(view: &AlertView, color: bool) -> String {
    let mut doc = String::new();
    let mut line = |label: &str, value: String| {
        doc.push_str(&format!("{label:<18}{value}\n"));
    };

    line(
        "Alert:",
        output::alert_text(&view.description, view.active, color),
    );
    line(
        "Fuel Difference:",
        format!("{} units", view.fuel_level_difference),
    );
    line("Monitored:", yes_no(view.monitored));
    line("Resolved:", yes_no(view.resolved));
    doc.pop();
    doc
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes".into() } else { "No".into() }
}
