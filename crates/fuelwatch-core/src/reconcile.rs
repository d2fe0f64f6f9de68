// ── Alert/log reconciliation ──
//
// The pure logic between remote snapshots and derived view state:
// recent-log selection, vehicle transitions, and incident planning.
// Everything here is synchronous and side-effect free; the Monitor
// applies the results against the store and the remote database.

use std::sync::Arc;

use rand::Rng;

use crate::model::{
    Alerts, EVENT_VEHICLE_STARTED, EVENT_VEHICLE_STOPPED, EventKind, LogEntry,
};

/// How many entries each recent-log list keeps.
pub const RECENT_LOG_LIMIT: usize = 3;

/// Inclusive bounds of the simulated fuel delta.
const FUEL_DELTA_MIN: i32 = 5;
const FUEL_DELTA_MAX: i32 = 15;

// ── Recent-log selection ─────────────────────────────────────────────

/// The derived per-category recent-log lists.
#[derive(Debug, Clone, Default)]
pub struct RecentLogSets {
    pub theft: Vec<Arc<LogEntry>>,
    pub refuel: Vec<Arc<LogEntry>>,
}

/// Partition entries into theft/refuel lists by substring match,
/// sorted strictly descending by timestamp and truncated to the
/// [`RECENT_LOG_LIMIT`] most recent.
///
/// An entry whose event type contains both keywords lands in both
/// lists (matching the dashboard this store was built for).
pub fn recent_logs(entries: impl IntoIterator<Item = Arc<LogEntry>>) -> RecentLogSets {
    let mut sets = RecentLogSets::default();

    for entry in entries {
        if entry.event_type.contains("Theft") {
            sets.theft.push(Arc::clone(&entry));
        }
        if entry.event_type.contains("Refueling") {
            sets.refuel.push(entry);
        }
    }

    for list in [&mut sets.theft, &mut sets.refuel] {
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        list.truncate(RECENT_LOG_LIMIT);
    }

    sets
}

// ── Vehicle transitions ──────────────────────────────────────────────

/// The state change produced by toggling the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleTransition {
    pub stopped: bool,
    pub ignition: bool,
    /// The log event type for this transition.
    pub event_type: &'static str,
}

/// Flip the vehicle's stopped state. Ignition always tracks the
/// inverse of `stopped`.
pub fn toggle_vehicle(currently_stopped: bool) -> VehicleTransition {
    let stopped = !currently_stopped;
    VehicleTransition {
        stopped,
        ignition: !stopped,
        event_type: if stopped {
            EVENT_VEHICLE_STOPPED
        } else {
            EVENT_VEHICLE_STARTED
        },
    }
}

// ── Incident injection ───────────────────────────────────────────────

/// A planned simulated incident: the alert to raise and the adjusted
/// fuel level.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentPlan {
    pub kind: EventKind,
    pub alerts: Alerts,
    pub fuel_level: f64,
}

/// Plan a simulated incident of the given kind.
///
/// Theft decreases the fuel level by `delta`, refueling increases it;
/// the result is clamped to `[0, 100]`. The raised alert carries the
/// kind's description and the (unclamped) delta, and turns monitoring
/// on.
pub fn plan_incident(kind: EventKind, current_fuel: f64, delta: f64) -> IncidentPlan {
    let fuel_level = match kind {
        EventKind::Theft => (current_fuel - delta).max(0.0),
        EventKind::Refuel => (current_fuel + delta).min(100.0),
    };

    IncidentPlan {
        kind,
        alerts: Alerts {
            fuel_theft: kind.alert_description().into(),
            fuel_level_difference: delta,
            is_resolved: false,
            is_monitored: true,
        },
        fuel_level,
    }
}

/// Draw a random fuel delta in the simulated range (5–15 units).
pub fn random_fuel_delta() -> f64 {
    f64::from(rand::thread_rng().gen_range(FUEL_DELTA_MIN..=FUEL_DELTA_MAX))
}
