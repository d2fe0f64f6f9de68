// ── Central reactive view store ──
//
// Holds the local mirror of remote telemetry plus derived state
// (location display, recent-log lists). Mutations are broadcast to
// subscribers via `watch` channels.

mod cell;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cell::StateCell;

use crate::model::{Alerts, CarStatus, LogEntry, SensorData, TelemetrySnapshot};
use crate::reconcile::{self, RECENT_LOG_LIMIT};
use crate::stream::StateStream;

/// Location display before the first lookup completes.
pub const LOCATION_FETCHING: &str = "Fetching location...";
/// Location display between failed lookup attempts.
pub const LOCATION_RETRYING: &str = "Error fetching location. Retrying...";
/// Location display after the retry budget is exhausted.
pub const LOCATION_UNAVAILABLE: &str = "Unable to fetch location. Please check your connection.";

/// One recent-log list as exposed to consumers.
pub type RecentLogs = Arc<Vec<Arc<LogEntry>>>;

/// Central reactive store for the telemetry mirror and derived state.
///
/// All reads are cheap clones out of `watch` channels; every mutation
/// notifies subscribers. Snapshot application is last-write-wins: the
/// incoming document replaces the mirror unconditionally, no merging.
pub struct ViewStore {
    telemetry: StateCell<Option<Arc<TelemetrySnapshot>>>,
    location: StateCell<String>,
    theft_logs: StateCell<RecentLogs>,
    refuel_logs: StateCell<RecentLogs>,
    last_refresh: StateCell<Option<DateTime<Utc>>>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self {
            telemetry: StateCell::new(None),
            location: StateCell::new(LOCATION_FETCHING.into()),
            theft_logs: StateCell::new(Arc::new(Vec::new())),
            refuel_logs: StateCell::new(Arc::new(Vec::new())),
            last_refresh: StateCell::new(None),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the telemetry mirror unconditionally (last-write-wins).
    pub fn apply_snapshot(&self, snapshot: TelemetrySnapshot) {
        self.telemetry.set(Some(Arc::new(snapshot)));
    }

    /// Mutate the mirror in place for optimistic local writes.
    /// No-op when no snapshot has been received yet.
    pub(crate) fn update_telemetry(&self, f: impl FnOnce(&mut TelemetrySnapshot)) {
        self.telemetry.update(|opt| {
            if let Some(snap) = opt {
                f(Arc::make_mut(snap));
            }
        });
    }

    /// Rebuild both recent-log lists from the full remote collection.
    pub fn apply_logs(&self, entries: Vec<LogEntry>) {
        let sets = reconcile::recent_logs(entries.into_iter().map(Arc::new));
        self.theft_logs.set(Arc::new(sets.theft));
        self.refuel_logs.set(Arc::new(sets.refuel));
    }

    /// Insert a freshly appended entry into the derived lists without
    /// waiting for the next refresh.
    pub(crate) fn insert_log(&self, entry: &Arc<LogEntry>) {
        if entry.event_type.contains("Theft") {
            Self::prepend(&self.theft_logs, entry);
        }
        if entry.event_type.contains("Refueling") {
            Self::prepend(&self.refuel_logs, entry);
        }
    }

    fn prepend(list: &StateCell<RecentLogs>, entry: &Arc<LogEntry>) {
        list.update(|current| {
            let mut entries = vec![Arc::clone(entry)];
            entries.extend(current.iter().cloned());
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            entries.truncate(RECENT_LOG_LIMIT);
            *current = Arc::new(entries);
        });
    }

    /// Empty both recent-log lists (remote collection was deleted).
    pub fn clear_logs(&self) {
        self.theft_logs.set(Arc::new(Vec::new()));
        self.refuel_logs.set(Arc::new(Vec::new()));
    }

    /// Publish a new location display string.
    pub fn set_location(&self, display: impl Into<String>) {
        self.location.set(display.into());
    }

    /// Record a completed refresh.
    pub(crate) fn mark_refreshed(&self) {
        self.last_refresh.set(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn telemetry(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.telemetry.get()
    }

    pub fn car_status(&self) -> Option<CarStatus> {
        self.telemetry().map(|s| s.car_status.clone())
    }

    pub fn sensor(&self) -> Option<SensorData> {
        self.telemetry().map(|s| s.sensor.clone())
    }

    pub fn alerts(&self) -> Option<Alerts> {
        self.telemetry().map(|s| s.alerts.clone())
    }

    pub fn location(&self) -> String {
        self.location.get()
    }

    pub fn theft_logs(&self) -> RecentLogs {
        self.theft_logs.get()
    }

    pub fn refuel_logs(&self) -> RecentLogs {
        self.refuel_logs.get()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh.get()
    }

    /// How long ago the last refresh completed, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_telemetry(&self) -> StateStream<Option<Arc<TelemetrySnapshot>>> {
        StateStream::new(self.telemetry.subscribe())
    }

    pub fn subscribe_location(&self) -> StateStream<String> {
        StateStream::new(self.location.subscribe())
    }

    pub fn subscribe_theft_logs(&self) -> StateStream<RecentLogs> {
        StateStream::new(self.theft_logs.subscribe())
    }

    pub fn subscribe_refuel_logs(&self) -> StateStream<RecentLogs> {
        StateStream::new(self.refuel_logs.subscribe())
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}
