// ── Telemetry domain types ──

use serde::{Deserialize, Serialize};

/// Sentinel value of `Alerts::fuel_theft` when no alert is active.
pub const NO_ALERTS: &str = "No alerts";

/// Vehicle status section of the telemetry document.
///
/// Latitude/longitude are free-text as stored, possibly carrying degree
/// decorations (`"12.9716° N"`); use [`CarStatus::coordinates`] for the
/// numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarStatus {
    pub ignition: bool,
    pub speed: f64,
    pub stopped: bool,
    pub latitude: String,
    pub longitude: String,
}

impl CarStatus {
    /// Parse the decorated coordinate strings into numeric (lat, lon).
    /// Returns `None` when either string has no parsable number.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((
            parse_coordinate(&self.latitude)?,
            parse_coordinate(&self.longitude)?,
        ))
    }
}

/// Environment sensor section of the telemetry document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub fuel_level: f64,
    pub humidity: f64,
    pub temperature: f64,
}

/// Alert section of the telemetry document.
///
/// `fuel_theft` is either [`NO_ALERTS`] or a free-text description
/// containing `"Theft"` or `"Refueling"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alerts {
    pub fuel_theft: String,
    pub fuel_level_difference: f64,
    pub is_resolved: bool,
    pub is_monitored: bool,
}

impl Alerts {
    /// Whether an alert is currently flagged.
    pub fn is_active(&self) -> bool {
        self.fuel_theft != NO_ALERTS
    }

    /// The quiescent state: no alert, resolved, not monitored.
    pub fn none() -> Self {
        Self {
            fuel_theft: NO_ALERTS.into(),
            fuel_level_difference: 0.0,
            is_resolved: true,
            is_monitored: false,
        }
    }
}

/// The full telemetry root document as mirrored from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub car_status: CarStatus,
    pub sensor: SensorData,
    pub alerts: Alerts,
}

/// Strip degree decorations from a stored coordinate and parse it.
///
/// Everything from the first `°` onward is dropped, then any remaining
/// characters outside `[0-9.\-]` are removed before parsing.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let head = raw.split('°').next().unwrap_or(raw);
    let cleaned: String = head
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}
