// fuelwatch-core: Reactive data layer between fuelwatch-api and consumers (CLI).

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod reconcile;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, ReportSource};
pub use config::MonitorConfig;
pub use error::CoreError;
pub use monitor::{ConnectionState, Monitor};
pub use store::{
    LOCATION_FETCHING, LOCATION_RETRYING, LOCATION_UNAVAILABLE, RecentLogs, ViewStore,
};
pub use stream::StateStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alerts, CarStatus, EventKind, FirReport, LogEntry, NO_ALERTS, SensorData, TelemetrySnapshot,
};
