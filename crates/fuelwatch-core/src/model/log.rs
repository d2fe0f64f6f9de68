// ── Event log domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::telemetry::{CarStatus, SensorData};

/// Event type stamped on vehicle-start log entries.
pub const EVENT_VEHICLE_STARTED: &str = "Vehicle Started";
/// Event type stamped on vehicle-stop log entries.
pub const EVENT_VEHICLE_STOPPED: &str = "Vehicle Stopped";
/// Event type stamped when an incident report is generated.
pub const EVENT_FIR_REPORTED: &str = "FIR Reported";

/// Classification of an alert description or log event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Theft,
    Refuel,
}

impl EventKind {
    /// Classify free text by substring match.
    ///
    /// `"Refueling"` is checked before `"Theft"`, so text containing
    /// both keywords classifies as `Refuel`. Text matching neither
    /// returns `None`.
    pub fn classify(text: &str) -> Option<Self> {
        if text.contains("Refueling") {
            Some(Self::Refuel)
        } else if text.contains("Theft") {
            Some(Self::Theft)
        } else {
            None
        }
    }

    /// The event type written to the log when an alert of this kind
    /// is resolved.
    pub fn resolved_event_type(self) -> &'static str {
        match self {
            Self::Theft => "Fuel Theft Detected",
            Self::Refuel => "Refueling Detected",
        }
    }

    /// The alert description set when an incident of this kind is
    /// injected.
    pub fn alert_description(self) -> &'static str {
        match self {
            Self::Theft => "Fuel Theft Detected!",
            Self::Refuel => "Fuel Refueling Detected!",
        }
    }

    /// The alternate kind (injection alternates theft/refuel).
    pub fn other(self) -> Self {
        match self {
            Self::Theft => Self::Refuel,
            Self::Refuel => Self::Theft,
        }
    }
}

/// One append-only event log entry.
///
/// Created exactly once per state transition and never mutated. The
/// car status and sensor data are captured at creation time, not
/// referenced live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub location: String,
    pub car_status: Option<CarStatus>,
    pub sensor_data: Option<SensorData>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(
        event_type: impl Into<String>,
        location: impl Into<String>,
        car_status: Option<CarStatus>,
        sensor_data: Option<SensorData>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            location: location.into(),
            car_status,
            sensor_data,
        }
    }

    /// Classify this entry's event type, if it names a fuel incident.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::classify(&self.event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_substrings() {
        assert_eq!(
            EventKind::classify("Fuel Theft Detected!"),
            Some(EventKind::Theft)
        );
        assert_eq!(
            EventKind::classify("Fuel Refueling Detected!"),
            Some(EventKind::Refuel)
        );
        assert_eq!(EventKind::classify("No alerts"), None);
        assert_eq!(EventKind::classify("Engine overheating"), None);
    }

    #[test]
    fn classify_prefers_refueling_on_ambiguous_text() {
        // Both keywords present: evaluation order fixes the winner.
        assert_eq!(
            EventKind::classify("Theft during Refueling"),
            Some(EventKind::Refuel)
        );
    }

    #[test]
    fn kinds_alternate() {
        assert_eq!(EventKind::Theft.other(), EventKind::Refuel);
        assert_eq!(EventKind::Refuel.other(), EventKind::Theft);
    }

    #[test]
    fn log_entry_wire_field_names() {
        let entry = LogEntry::now("Vehicle Stopped", "somewhere", None, None);
        let json = serde_json::to_value(&entry).expect("serialize");
        assert!(json.get("eventType").is_some());
        assert!(json.get("carStatus").is_some());
        assert!(json.get("sensorData").is_some());
        assert!(json.get("timestamp").is_some());
    }
}
