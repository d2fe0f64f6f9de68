// ── Domain model ──
//
// Wire-format field names follow the remote store exactly: snake_case
// for the telemetry sections, camelCase for log entries (the store was
// populated by the original dashboard client).

mod log;
mod report;
mod telemetry;

pub use log::{
    EVENT_FIR_REPORTED, EVENT_VEHICLE_STARTED, EVENT_VEHICLE_STOPPED, EventKind, LogEntry,
};
pub use report::FirReport;
pub use telemetry::{Alerts, CarStatus, NO_ALERTS, SensorData, TelemetrySnapshot};
