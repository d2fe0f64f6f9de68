// ── Monitor abstraction ──
//
// Full lifecycle management for a telemetry store connection. Handles
// the initial mirror load, background refresh, command routing, the
// reverse-geocode worker, and reactive streaming through the ViewStore.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fuelwatch_api::{GeocodeClient, TelemetryDb};

use crate::command::{Command, CommandEnvelope, CommandResult, ReportSource};
use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::{
    EVENT_FIR_REPORTED, EventKind, FirReport, LogEntry, NO_ALERTS, TelemetrySnapshot,
};
use crate::reconcile;
use crate::store::{LOCATION_RETRYING, LOCATION_UNAVAILABLE, ViewStore};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Remote node paths, relative to the database root.
const NODE_CAR_STATUS: &str = "car_status";
const NODE_SENSOR: &str = "sensor";
const NODE_ALERTS: &str = "alerts";
const NODE_LOGS: &str = "logs";

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Monitor ──────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Manages the full session
/// lifecycle: initial mirror load, periodic refresh, command routing,
/// the location worker, and reactive state streaming.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    store: Arc<ViewStore>,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Child token for the current session — cancelled on disconnect,
    /// replaced on reconnect.
    cancel_child: Mutex<CancellationToken>,
    db: Mutex<Option<Arc<TelemetryDb>>>,
    geocode: Mutex<Option<Arc<GeocodeClient>>>,
    /// Coordinate updates for the location worker. The worker dedups
    /// against the last resolved pair, so refreshes are cheap to send.
    coords_tx: Mutex<mpsc::UnboundedSender<(f64, f64)>>,
    coords_rx: Mutex<Option<mpsc::UnboundedReceiver<(f64, f64)>>>,
    /// Kind of the next injected incident. Starts at Theft, flips
    /// whenever an alert is resolved.
    next_incident: Mutex<EventKind>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a new Monitor from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to load the mirror and start
    /// background tasks.
    pub fn new(config: MonitorConfig) -> Self {
        let store = Arc::new(ViewStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (coords_tx, coords_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(MonitorInner {
                config,
                store,
                connection_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                db: Mutex::new(None),
                geocode: Mutex::new(None),
                coords_tx: Mutex::new(coords_tx),
                coords_rx: Mutex::new(Some(coords_rx)),
                next_incident: Mutex::new(EventKind::Theft),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Access the underlying ViewStore.
    pub fn store(&self) -> &Arc<ViewStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the telemetry store.
    ///
    /// Builds the HTTP clients, performs the initial mirror load, and
    /// spawns background tasks (periodic refresh, command processor,
    /// location worker).
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        // Fresh child token for this session (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let config = &self.inner.config;
        let transport = config.transport();

        let db = TelemetryDb::new(
            config.database_url.clone(),
            config.auth_token.clone(),
            &transport,
        )?;
        let geocode = GeocodeClient::new(config.geocode_url.clone(), &transport)?;

        *self.inner.db.lock().await = Some(Arc::new(db));
        *self.inner.geocode.lock().await = Some(Arc::new(geocode));

        // Initial mirror load. A failure here is fatal to connect.
        if let Err(e) = self.refresh().await {
            self.inner
                .connection_state
                .send_replace(ConnectionState::Failed);
            *self.inner.db.lock().await = None;
            *self.inner.geocode.lock().await = None;
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.coords_rx.lock().await.take() {
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(location_worker(monitor, rx, cancel)));
        }

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let monitor = self.clone();
            handles.push(tokio::spawn(command_processor_task(monitor, rx)));
        }

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(refresh_task(monitor, interval_secs, cancel)));
        }
        drop(handles);

        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!("connected to telemetry store");
        Ok(())
    }

    /// Disconnect from the telemetry store.
    ///
    /// Cancels background tasks and resets the connection state to
    /// [`Disconnected`](ConnectionState::Disconnected).
    pub async fn disconnect(&self) {
        // Cancel the child token (not the parent — allows reconnect).
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        *self.inner.db.lock().await = None;
        *self.inner.geocode.lock().await = None;

        // Recreate the channels so reconnects can spawn fresh workers.
        // The previous receivers were consumed by the background tasks.
        {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
            *self.inner.command_rx.lock().await = Some(rx);
        }
        {
            let (tx, rx) = mpsc::unbounded_channel();
            *self.inner.coords_tx.lock().await = tx;
            *self.inner.coords_rx.lock().await = Some(rx);
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch the telemetry document and the log collection from the
    /// store and update the ViewStore.
    ///
    /// Snapshot application is last-write-wins. A coordinate change is
    /// forwarded to the location worker; the lookup never blocks or
    /// fails the refresh.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let db = self.require_db().await?;

        let (snapshot_res, logs_res) = tokio::join!(
            db.get::<TelemetrySnapshot>(""),
            db.get::<HashMap<String, LogEntry>>(NODE_LOGS),
        );

        match snapshot_res? {
            Some(snapshot) => {
                if let Some(coords) = snapshot.car_status.coordinates() {
                    let _ = self.inner.coords_tx.lock().await.send(coords);
                } else {
                    warn!(
                        latitude = %snapshot.car_status.latitude,
                        longitude = %snapshot.car_status.longitude,
                        "unparsable coordinates in snapshot"
                    );
                }
                self.inner.store.apply_snapshot(snapshot);
            }
            None => debug!("telemetry document absent, keeping current mirror"),
        }

        match logs_res {
            Ok(logs) => {
                let entries: Vec<LogEntry> =
                    logs.map(|m| m.into_values().collect()).unwrap_or_default();
                self.inner.store.apply_logs(entries);
            }
            Err(e) => warn!(error = %e, "log fetch failed (non-fatal)"),
        }

        self.inner.store.mark_refreshed();
        Ok(())
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the store.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::Disconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        let command_tx = self.inner.command_tx.lock().await.clone();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI: disables periodic refresh since we only need
    /// a single request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Monitor) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let monitor = Monitor::new(cfg);
        monitor.connect().await?;
        let result = f(monitor.clone()).await;
        monitor.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────

    async fn require_db(&self) -> Result<Arc<TelemetryDb>, CoreError> {
        self.inner
            .db
            .lock()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(CoreError::Disconnected)
    }

    async fn require_geocode(&self) -> Result<Arc<GeocodeClient>, CoreError> {
        self.inner
            .geocode
            .lock()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(CoreError::Disconnected)
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(monitor: Monitor, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = monitor.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Process commands from the mpsc channel, routing each to the
/// appropriate store operation.
async fn command_processor_task(monitor: Monitor, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = monitor.inner.cancel_child.lock().await.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&monitor, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

/// Resolve coordinate updates to a display location.
///
/// Deduplicates against the last processed pair so periodic refreshes
/// of an unchanged position cost nothing. Each new pair is retried per
/// the configured policy with the interim/fallback messages published
/// between attempts; a lookup never produces an error upstream.
async fn location_worker(
    monitor: Monitor,
    mut rx: mpsc::UnboundedReceiver<(f64, f64)>,
    cancel: CancellationToken,
) {
    let mut last: Option<(u64, u64)> = None;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            coords = rx.recv() => {
                let Some((lat, lon)) = coords else { break };
                let key = (lat.to_bits(), lon.to_bits());
                if last == Some(key) {
                    continue;
                }
                resolve_location(&monitor, lat, lon).await;
                last = Some(key);
            }
        }
    }
}

async fn resolve_location(monitor: &Monitor, lat: f64, lon: f64) {
    let Ok(geocode) = monitor.require_geocode().await else {
        return;
    };
    let policy = monitor.inner.config.geocode_retry;
    let store = &monitor.inner.store;

    for attempt in 1..=policy.max_attempts.max(1) {
        match geocode.reverse(lat, lon).await {
            Ok(display_name) => {
                debug!(attempt, "location resolved");
                store.set_location(display_name);
                return;
            }
            Err(e) => {
                warn!(attempt, error = %e, "location lookup failed");
                if attempt < policy.max_attempts {
                    store.set_location(LOCATION_RETRYING);
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    store.set_location(LOCATION_UNAVAILABLE);
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command to the appropriate store writes and local updates.
///
/// Local state is updated optimistically after the remote patch
/// succeeds; log appends are warn-only so a flaky log write never
/// fails the operation it records.
#[allow(clippy::too_many_lines)]
async fn route_command(monitor: &Monitor, cmd: Command) -> Result<CommandResult, CoreError> {
    let db = monitor.require_db().await?;
    let store = &monitor.inner.store;

    match cmd {
        Command::ToggleVehicle => {
            let snapshot = store.telemetry().ok_or(CoreError::NoSnapshot)?;
            let transition = reconcile::toggle_vehicle(snapshot.car_status.stopped);

            db.patch(
                NODE_CAR_STATUS,
                &serde_json::json!({
                    "stopped": transition.stopped,
                    "ignition": transition.ignition,
                }),
            )
            .await?;

            store.update_telemetry(|s| {
                s.car_status.stopped = transition.stopped;
                s.car_status.ignition = transition.ignition;
            });

            // Car status and sensor data are captured at call time,
            // before any simulated incident adjusts the fuel level.
            append_log(
                &db,
                store,
                LogEntry::now(
                    transition.event_type,
                    store.location(),
                    Some(snapshot.car_status.clone()),
                    Some(snapshot.sensor.clone()),
                ),
            )
            .await;

            let mut incident = None;
            if !transition.stopped {
                if snapshot.alerts.is_active() {
                    warn!(
                        alert = %snapshot.alerts.fuel_theft,
                        "unresolved alert active, skipping incident injection"
                    );
                } else {
                    let kind = *monitor.inner.next_incident.lock().await;
                    let plan = reconcile::plan_incident(
                        kind,
                        snapshot.sensor.fuel_level,
                        reconcile::random_fuel_delta(),
                    );

                    db.patch(NODE_ALERTS, &plan.alerts).await?;
                    db.patch(
                        NODE_SENSOR,
                        &serde_json::json!({ "fuel_level": plan.fuel_level }),
                    )
                    .await?;

                    store.update_telemetry(|s| {
                        s.alerts = plan.alerts.clone();
                        s.sensor.fuel_level = plan.fuel_level;
                    });

                    info!(kind = ?plan.kind, delta = plan.alerts.fuel_level_difference,
                        "simulated incident injected");
                    incident = Some(plan.kind);
                }
            }

            Ok(CommandResult::VehicleToggled {
                stopped: transition.stopped,
                incident,
            })
        }

        Command::ResolveAlert => {
            let snapshot = store.telemetry().ok_or(CoreError::NoSnapshot)?;
            let alerts = &snapshot.alerts;

            if !alerts.is_active() {
                warn!("resolve requested with no active alert");
                return Ok(CommandResult::Skipped {
                    reason: "no active alert".into(),
                });
            }

            let Some(kind) = EventKind::classify(&alerts.fuel_theft) else {
                warn!(alert = %alerts.fuel_theft, "unrecognized alert text, leaving alert active");
                return Ok(CommandResult::Skipped {
                    reason: format!("unrecognized alert text: {}", alerts.fuel_theft),
                });
            };

            db.patch(
                NODE_ALERTS,
                &serde_json::json!({
                    "fuel_theft": NO_ALERTS,
                    "is_resolved": true,
                    "is_monitored": false,
                }),
            )
            .await?;

            store.update_telemetry(|s| {
                s.alerts.fuel_theft = NO_ALERTS.into();
                s.alerts.is_resolved = true;
                s.alerts.is_monitored = false;
            });

            append_log(
                &db,
                store,
                LogEntry::now(
                    kind.resolved_event_type(),
                    store.location(),
                    Some(snapshot.car_status.clone()),
                    Some(snapshot.sensor.clone()),
                ),
            )
            .await;

            // The next injected incident alternates kind.
            *monitor.inner.next_incident.lock().await = kind.other();

            info!(kind = ?kind, "alert resolved");
            Ok(CommandResult::Ok)
        }

        Command::StartMonitoring => {
            db.patch(NODE_ALERTS, &serde_json::json!({ "is_monitored": true }))
                .await?;
            store.update_telemetry(|s| s.alerts.is_monitored = true);
            Ok(CommandResult::Ok)
        }

        Command::ClearLogs => {
            db.delete(NODE_LOGS).await?;
            store.clear_logs();
            info!("log collection cleared");
            Ok(CommandResult::Ok)
        }

        Command::GenerateReport { source } => {
            let officer = &monitor.inner.config.officer;
            let report = match source {
                ReportSource::Live => {
                    let snapshot = store.telemetry().ok_or(CoreError::NoSnapshot)?;
                    let incident_type = if snapshot.alerts.is_active() {
                        snapshot.alerts.fuel_theft.clone()
                    } else {
                        "General Incident".into()
                    };
                    let description = format!(
                        "{} reported near {}. Fuel level difference: {} units.",
                        incident_type,
                        store.location(),
                        snapshot.alerts.fuel_level_difference,
                    );
                    FirReport::from_context(
                        officer,
                        store.location(),
                        incident_type,
                        description,
                        &snapshot.car_status,
                        &snapshot.sensor,
                    )
                }
                ReportSource::Entry(entry) => FirReport::from_log(officer, &entry),
            };

            append_log(
                &db,
                store,
                LogEntry::now(
                    EVENT_FIR_REPORTED,
                    report.location.clone(),
                    store.car_status(),
                    store.sensor(),
                ),
            )
            .await;

            info!(fir_number = %report.fir_number, "incident report generated");
            Ok(CommandResult::Report(Box::new(report)))
        }
    }
}

/// Append a log entry remotely and insert it into the derived lists.
/// Failures are logged and swallowed: a flaky log write must never
/// fail the state transition it records.
async fn append_log(db: &TelemetryDb, store: &ViewStore, entry: LogEntry) {
    let entry = Arc::new(entry);
    match db.push(NODE_LOGS, entry.as_ref()).await {
        Ok(key) => {
            debug!(%key, event = %entry.event_type, "log entry appended");
            store.insert_log(&entry);
        }
        Err(e) => warn!(error = %e, event = %entry.event_type, "log append failed (non-fatal)"),
    }
}
