//! `fuelwatch watch` — stream telemetry changes until interrupted.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use fuelwatch_core::{Monitor, TelemetrySnapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WatchEvent {
    Telemetry {
        time: String,
        vehicle: String,
        speed: f64,
        fuel_level: f64,
        alert: String,
    },
    Location {
        time: String,
        location: String,
    },
}

pub async fn run(global: &GlobalOpts, args: &WatchArgs) -> Result<(), CliError> {
    let mut monitor_config = crate::config::resolve_monitor_config(global)?;
    monitor_config.refresh_interval_secs = args.interval.max(1);

    let monitor = Monitor::new(monitor_config);
    monitor.connect().await.map_err(CliError::from)?;

    let mut telemetry = monitor.store().subscribe_telemetry();
    let mut location = monitor.store().subscribe_location();

    if let Some(snapshot) = telemetry.current().clone() {
        emit(global, &telemetry_event(&snapshot));
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = telemetry.changed() => {
                match changed {
                    Some(Some(snapshot)) => emit(global, &telemetry_event(&snapshot)),
                    Some(None) => {}
                    None => break,
                }
            }
            changed = location.changed() => {
                let Some(display) = changed else { break };
                emit(global, &WatchEvent::Location {
                    time: now(),
                    location: display,
                });
            }
        }
    }

    monitor.disconnect().await;
    Ok(())
}

fn telemetry_event(snapshot: &Arc<TelemetrySnapshot>) -> WatchEvent {
    WatchEvent::Telemetry {
        time: now(),
        vehicle: if snapshot.car_status.stopped {
            "Stopped".into()
        } else {
            "Running".into()
        },
        speed: snapshot.car_status.speed,
        fuel_level: snapshot.sensor.fuel_level,
        alert: snapshot.alerts.fuel_theft.clone(),
    }
}

fn now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

/// One line per event. Structured formats emit compact JSON so the
/// stream stays line-oriented for piping.
fn emit(global: &GlobalOpts, event: &WatchEvent) {
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serde_json::to_string(event).unwrap_or_default()
        }
        OutputFormat::Table | OutputFormat::Plain => match event {
            WatchEvent::Telemetry {
                time,
                vehicle,
                speed,
                fuel_level,
                alert,
            } => {
                format!("{time}  {vehicle:<8} speed={speed} km/h  fuel={fuel_level} L  alert={alert}")
            }
            WatchEvent::Location { time, location } => {
                format!("{time}  location: {location}")
            }
        },
    };
    output::print_output(&line, global.quiet);
}
