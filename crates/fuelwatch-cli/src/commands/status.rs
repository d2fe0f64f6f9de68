//! `fuelwatch status` — one-shot telemetry snapshot.

use std::time::Duration;

use serde::Serialize;

use fuelwatch_core::{CoreError, Monitor, TelemetrySnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

/// How long a oneshot waits for the reverse-geocode lookup to settle.
const LOCATION_BUDGET: Duration = Duration::from_secs(8);

#[derive(Debug, Serialize)]
struct StatusView {
    vehicle: String,
    ignition: bool,
    speed: f64,
    location: String,
    fuel_level: f64,
    temperature: f64,
    humidity: f64,
    alert: String,
    alert_active: bool,
    monitored: bool,
}

impl StatusView {
    fn new(snapshot: &TelemetrySnapshot, location: String) -> Self {
        Self {
            vehicle: if snapshot.car_status.stopped {
                "Stopped".into()
            } else {
                "Running".into()
            },
            ignition: snapshot.car_status.ignition,
            speed: snapshot.car_status.speed,
            location,
            fuel_level: snapshot.sensor.fuel_level,
            temperature: snapshot.sensor.temperature,
            humidity: snapshot.sensor.humidity,
            alert: snapshot.alerts.fuel_theft.clone(),
            alert_active: snapshot.alerts.is_active(),
            monitored: snapshot.alerts.is_monitored,
        }
    }
}

pub async fn run(global: &GlobalOpts) -> Result<(), CliError> {
    let monitor_config = crate::config::resolve_monitor_config(global)?;
    let color = output::should_color(&global.color);

    let view = Monitor::oneshot(monitor_config, |monitor| async move {
        let snapshot = monitor.store().telemetry().ok_or(CoreError::NoSnapshot)?;
        let location = util::settled_location(&monitor, LOCATION_BUDGET).await;
        Ok(StatusView::new(&snapshot, location))
    })
    .await?;

    let rendered = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| format!("{} fuel={} alert={}", v.vehicle, v.fuel_level, v.alert),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn detail(view: &StatusView, color: bool) -> String {
    let mut doc = String::new();
    let mut line = |label: &str, value: String| {
        doc.push_str(&format!("{label:<14}{value}\n"));
    };

    line("Vehicle:", view.vehicle.clone());
    line("Ignition:", if view.ignition { "On".into() } else { "Off".into() });
    line("Speed:", format!("{} km/h", view.speed));
    line("Location:", view.location.clone());
    line("Fuel Level:", format!("{} L", view.fuel_level));
    line("Temperature:", format!("{} °C", view.temperature));
    line("Humidity:", format!("{} %", view.humidity));
    line(
        "Alert:",
        output::alert_text(&view.alert, view.alert_active, color),
    );
    line("Monitored:", if view.monitored { "Yes".into() } else { "No".into() });
    doc.pop();
    doc
}
