// ── First Information Report (FIR) ──
//
// A formatted incident document built from the latest alert context or
// from a stored log entry. Rendering targets plain text; how a
// consumer lays the text out (PDF, terminal) is its own concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::LogEntry;
use super::telemetry::{CarStatus, SensorData};

/// A generated First Information Report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirReport {
    pub fir_number: String,
    pub date: DateTime<Utc>,
    pub officer: String,
    pub location: String,
    pub incident_type: String,
    /// When the incident itself occurred (log timestamp, or report
    /// time when generated from live state).
    pub incident_time: DateTime<Utc>,
    pub speed: Option<f64>,
    pub ignition: Option<bool>,
    pub stopped: Option<bool>,
    pub fuel_level: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub description: String,
}

impl FirReport {
    /// Build a report from live telemetry context.
    pub fn from_context(
        officer: impl Into<String>,
        location: impl Into<String>,
        incident_type: impl Into<String>,
        description: impl Into<String>,
        car_status: &CarStatus,
        sensor: &SensorData,
    ) -> Self {
        let now = Utc::now();
        Self {
            fir_number: fir_number(now),
            date: now,
            officer: officer.into(),
            location: location.into(),
            incident_type: incident_type.into(),
            incident_time: now,
            speed: Some(car_status.speed),
            ignition: Some(car_status.ignition),
            stopped: Some(car_status.stopped),
            fuel_level: Some(sensor.fuel_level),
            temperature: Some(sensor.temperature),
            humidity: Some(sensor.humidity),
            description: description.into(),
        }
    }

    /// Build a report from a stored log entry (the entry's captured
    /// car status and sensor data, not the live state).
    pub fn from_log(officer: impl Into<String>, entry: &LogEntry) -> Self {
        let now = Utc::now();
        Self {
            fir_number: fir_number(now),
            date: now,
            officer: officer.into(),
            location: entry.location.clone(),
            incident_type: entry.event_type.clone(),
            incident_time: entry.timestamp,
            speed: entry.car_status.as_ref().map(|c| c.speed),
            ignition: entry.car_status.as_ref().map(|c| c.ignition),
            stopped: entry.car_status.as_ref().map(|c| c.stopped),
            fuel_level: entry.sensor_data.as_ref().map(|s| s.fuel_level),
            temperature: entry.sensor_data.as_ref().map(|s| s.temperature),
            humidity: entry.sensor_data.as_ref().map(|s| s.humidity),
            description: format!(
                "{} recorded at {} near {}.",
                entry.event_type,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.location
            ),
        }
    }

    /// Render the report as a formatted text document.
    pub fn render(&self) -> String {
        let mut doc = String::new();
        let mut line = |label: &str, value: String| {
            doc.push_str(&format!("{label:<18}{value}\n"));
        };

        line("FIR Number:", self.fir_number.clone());
        line("Date:", self.date.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        line("Officer:", self.officer.clone());
        line("Location:", self.location.clone());
        line("Incident:", self.incident_type.clone());
        line(
            "Incident Time:",
            self.incident_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        line("Vehicle Speed:", fmt_opt(self.speed, " km/h"));
        line(
            "Ignition:",
            match self.ignition {
                Some(true) => "On".into(),
                Some(false) => "Off".into(),
                None => "-".into(),
            },
        );
        line(
            "Vehicle Status:",
            match self.stopped {
                Some(true) => "Stopped".into(),
                Some(false) => "Running".into(),
                None => "-".into(),
            },
        );
        line("Fuel Level:", fmt_opt(self.fuel_level, " L"));
        line("Temperature:", fmt_opt(self.temperature, " °C"));
        line("Humidity:", fmt_opt(self.humidity, " %"));
        doc.push('\n');
        doc.push_str(&self.description);
        doc.push('\n');
        doc
    }
}

fn fir_number(at: DateTime<Utc>) -> String {
    format!("FIR-{}", at.format("%Y%m%d-%H%M%S"))
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v}{unit}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: "2026-03-01T10:15:00Z".parse().expect("timestamp"),
            event_type: "Fuel Theft Detected".into(),
            location: "MG Road, Bengaluru".into(),
            car_status: Some(CarStatus {
                ignition: false,
                speed: 0.0,
                stopped: true,
                latitude: "12.9716° N".into(),
                longitude: "77.5946° E".into(),
            }),
            sensor_data: Some(SensorData {
                fuel_level: 62.0,
                humidity: 45.0,
                temperature: 28.0,
            }),
        }
    }

    #[test]
    fn report_from_log_captures_entry_state() {
        let report = FirReport::from_log("Officer K", &sample_entry());
        assert_eq!(report.incident_type, "Fuel Theft Detected");
        assert_eq!(report.location, "MG Road, Bengaluru");
        assert_eq!(report.fuel_level, Some(62.0));
        assert_eq!(report.speed, Some(0.0));
        assert_eq!(
            report.incident_time,
            "2026-03-01T10:15:00Z".parse::<DateTime<Utc>>().expect("ts")
        );
        assert!(report.fir_number.starts_with("FIR-"));
    }

    #[test]
    fn render_contains_every_field_label() {
        let report = FirReport::from_log("Officer K", &sample_entry());
        let doc = report.render();
        for label in [
            "FIR Number:",
            "Date:",
            "Officer:",
            "Location:",
            "Incident:",
            "Incident Time:",
            "Vehicle Speed:",
            "Ignition:",
            "Vehicle Status:",
            "Fuel Level:",
            "Temperature:",
            "Humidity:",
        ] {
            assert!(doc.contains(label), "missing {label} in:\n{doc}");
        }
        assert!(doc.contains("62 L"));
        assert!(doc.contains("Stopped"));
    }

    #[test]
    fn report_from_sparse_log_renders_placeholders() {
        let entry = LogEntry {
            car_status: None,
            sensor_data: None,
            ..sample_entry()
        };
        let report = FirReport::from_log("Officer K", &entry);
        assert_eq!(report.speed, None);
        assert!(report.render().contains("Vehicle Speed:    -"));
    }
}
