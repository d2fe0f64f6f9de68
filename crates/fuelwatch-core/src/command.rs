// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// Monitor routes each variant through the command processor task,
// which applies it against the remote store and the local mirror.

use crate::error::CoreError;
use crate::model::{EventKind, FirReport, LogEntry};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// Which context an incident report is built from.
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// The latest snapshot, alert, and location.
    Live,
    /// A specific stored log entry (its captured car status and
    /// sensor data, not the live state).
    Entry(Box<LogEntry>),
}

/// All write operations against the telemetry store.
#[derive(Debug, Clone)]
pub enum Command {
    /// Flip the vehicle's stopped state. Starting the vehicle may
    /// inject a simulated incident.
    ToggleVehicle,

    /// Resolve the active fuel alert, appending one log entry of the
    /// classified kind.
    ResolveAlert,

    /// Turn fuel monitoring on. Idempotent.
    StartMonitoring,

    /// Bulk-delete the remote log collection.
    ClearLogs,

    /// Build a First Information Report and append an `"FIR Reported"`
    /// log entry.
    GenerateReport { source: ReportSource },
}

/// The outcome of a successfully routed command.
#[derive(Debug)]
pub enum CommandResult {
    /// The command completed with nothing further to report.
    Ok,

    /// The command was valid but deliberately not applied.
    Skipped { reason: String },

    /// The vehicle was toggled; `incident` carries the kind of the
    /// simulated incident injected on start, if any.
    VehicleToggled {
        stopped: bool,
        incident: Option<EventKind>,
    },

    /// A generated incident report.
    Report(Box<FirReport>),
}
