// Integration tests for `Monitor` against a mocked telemetry store.
#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuelwatch_api::RetryPolicy;
use fuelwatch_core::{
    Command, CommandResult, EventKind, LOCATION_UNAVAILABLE, Monitor, MonitorConfig, ReportSource,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(db: &MockServer, geo: &MockServer) -> MonitorConfig {
    MonitorConfig {
        database_url: db.uri().parse().unwrap(),
        geocode_url: geo.uri().parse().unwrap(),
        geocode_retry: RetryPolicy {
            max_attempts: 3,
            backoff: Duration::ZERO,
        },
        refresh_interval_secs: 0,
        ..MonitorConfig::default()
    }
}

fn snapshot_json(stopped: bool, fuel: f64, alert: &str) -> serde_json::Value {
    json!({
        "car_status": {
            "ignition": !stopped,
            "speed": if stopped { 0.0 } else { 42.0 },
            "stopped": stopped,
            "latitude": "12.9716° N",
            "longitude": "77.5946° E"
        },
        "sensor": { "fuel_level": fuel, "humidity": 45.0, "temperature": 28.0 },
        "alerts": {
            "fuel_theft": alert,
            "fuel_level_difference": if alert == "No alerts" { 0.0 } else { 8.0 },
            "is_resolved": alert == "No alerts",
            "is_monitored": alert != "No alerts"
        }
    })
}

fn log_json(event_type: &str, hour: u32) -> serde_json::Value {
    json!({
        "timestamp": format!("2026-03-01T{hour:02}:00:00Z"),
        "eventType": event_type,
        "location": "MG Road, Bengaluru",
        "carStatus": null,
        "sensorData": null
    })
}

async fn mount_snapshot(server: &MockServer, doc: &serde_json::Value, logs: &serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs))
        .mount(server)
        .await;
}

async fn mount_geocode_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "display_name": "MG Road, Bengaluru" })),
        )
        .mount(server)
        .await;
}

async fn mount_push_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/logs.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-NxKey" })))
        .mount(server)
        .await;
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within timeout");
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_is_last_write_wins() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(false, 80.0, "No alerts"), &json!(null)).await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();
    assert_eq!(
        monitor.store().telemetry().unwrap().sensor.fuel_level,
        80.0
    );

    // The mirror is replaced wholesale, never merged.
    db.reset().await;
    mount_snapshot(&db, &snapshot_json(true, 55.0, "No alerts"), &json!(null)).await;
    monitor.refresh().await.unwrap();

    let current = monitor.store().telemetry().unwrap();
    assert_eq!(current.sensor.fuel_level, 55.0);
    assert!(current.car_status.stopped);

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_refresh_rebuilds_bounded_sorted_log_lists() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(true, 80.0, "No alerts"),
        &json!({
            "a": log_json("Fuel Theft Detected", 1),
            "b": log_json("Fuel Theft Detected", 4),
            "c": log_json("Fuel Theft Detected", 2),
            "d": log_json("Fuel Theft Detected", 3),
            "e": log_json("Refueling Detected", 5),
            "f": log_json("Vehicle Stopped", 6),
        }),
    )
    .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let theft = monitor.store().theft_logs();
    assert_eq!(theft.len(), 3);
    assert!(theft[0].timestamp > theft[1].timestamp);
    assert!(theft[1].timestamp > theft[2].timestamp);
    assert_eq!(monitor.store().refuel_logs().len(), 1);

    monitor.disconnect().await;
}

// ── Alert resolution ────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_with_no_active_alert_writes_nothing() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(true, 80.0, "No alerts"), &json!(null)).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&db)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let result = monitor.execute(Command::ResolveAlert).await.unwrap();
    assert!(matches!(result, CommandResult::Skipped { .. }));
    assert!(monitor.store().theft_logs().is_empty());

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_resolve_theft_patches_alerts_and_appends_one_log() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(true, 72.0, "Fuel Theft Detected!"),
        &json!(null),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/alerts.json"))
        .and(body_json(json!({
            "fuel_theft": "No alerts",
            "is_resolved": true,
            "is_monitored": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;
    Mock::given(method("POST"))
        .and(path("/logs.json"))
        .and(body_partial_json(json!({ "eventType": "Fuel Theft Detected" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-N1" })))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let result = monitor.execute(Command::ResolveAlert).await.unwrap();
    assert!(matches!(result, CommandResult::Ok));

    let alerts = monitor.store().alerts().unwrap();
    assert!(!alerts.is_active());
    assert!(alerts.is_resolved);
    assert!(!alerts.is_monitored);

    let theft = monitor.store().theft_logs();
    assert_eq!(theft.len(), 1);
    assert_eq!(theft[0].event_type, "Fuel Theft Detected");

    monitor.disconnect().await;
}

// ── Vehicle toggling & incident injection ───────────────────────────

#[tokio::test]
async fn test_stopping_captures_state_at_call_time() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(false, 80.0, "No alerts"), &json!(null)).await;

    Mock::given(method("PATCH"))
        .and(path("/car_status.json"))
        .and(body_json(json!({ "stopped": true, "ignition": false })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;
    // The appended log carries the running-state snapshot, not the
    // post-toggle one.
    Mock::given(method("POST"))
        .and(path("/logs.json"))
        .and(body_partial_json(json!({
            "eventType": "Vehicle Stopped",
            "carStatus": { "speed": 42.0, "stopped": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-N2" })))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let result = monitor.execute(Command::ToggleVehicle).await.unwrap();
    match result {
        CommandResult::VehicleToggled { stopped, incident } => {
            assert!(stopped);
            assert!(incident.is_none());
        }
        other => panic!("expected VehicleToggled, got {other:?}"),
    }
    assert!(monitor.store().car_status().unwrap().stopped);

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_starting_clean_injects_bounded_incident() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(true, 60.0, "No alerts"), &json!(null)).await;
    mount_push_ok(&db).await;

    Mock::given(method("PATCH"))
        .and(path("/car_status.json"))
        .and(body_json(json!({ "stopped": false, "ignition": true })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;
    // First injected incident is always a theft.
    Mock::given(method("PATCH"))
        .and(path("/alerts.json"))
        .and(body_partial_json(json!({
            "fuel_theft": "Fuel Theft Detected!",
            "is_resolved": false,
            "is_monitored": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/sensor.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let result = monitor.execute(Command::ToggleVehicle).await.unwrap();
    match result {
        CommandResult::VehicleToggled { stopped, incident } => {
            assert!(!stopped);
            assert_eq!(incident, Some(EventKind::Theft));
        }
        other => panic!("expected VehicleToggled, got {other:?}"),
    }

    let current = monitor.store().telemetry().unwrap();
    assert!(current.alerts.is_active());
    let fuel = current.sensor.fuel_level;
    assert!(
        (45.0..=55.0).contains(&fuel),
        "theft delta out of 5-15 range: fuel {fuel}"
    );

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_starting_with_unresolved_alert_skips_injection() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(true, 60.0, "Fuel Theft Detected!"),
        &json!(null),
    )
    .await;
    mount_push_ok(&db).await;

    Mock::given(method("PATCH"))
        .and(path("/car_status.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&db)
        .await;
    // The active alert must not be overwritten by a second incident.
    Mock::given(method("PATCH"))
        .and(path("/alerts.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&db)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/sensor.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let result = monitor.execute(Command::ToggleVehicle).await.unwrap();
    match result {
        CommandResult::VehicleToggled { stopped, incident } => {
            assert!(!stopped);
            assert!(incident.is_none());
        }
        other => panic!("expected VehicleToggled, got {other:?}"),
    }
    assert_eq!(
        monitor.store().sensor().unwrap().fuel_level,
        60.0,
        "fuel untouched when injection is skipped"
    );

    monitor.disconnect().await;
}

// ── Log management ──────────────────────────────────────────────────

#[tokio::test]
async fn test_clear_logs_deletes_collection_and_empties_lists() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(true, 80.0, "No alerts"),
        &json!({
            "a": log_json("Fuel Theft Detected", 1),
            "b": log_json("Refueling Detected", 2),
        }),
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path("/logs.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();
    assert_eq!(monitor.store().theft_logs().len(), 1);

    let result = monitor.execute(Command::ClearLogs).await.unwrap();
    assert!(matches!(result, CommandResult::Ok));
    assert!(monitor.store().theft_logs().is_empty());
    assert!(monitor.store().refuel_logs().is_empty());

    monitor.disconnect().await;
}

// ── Location resolution ─────────────────────────────────────────────

#[tokio::test]
async fn test_location_resolves_from_snapshot_coordinates() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(true, 80.0, "No alerts"), &json!(null)).await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let store = std::sync::Arc::clone(monitor.store());
    wait_until(move || store.location() == "MG Road, Bengaluru").await;

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_location_falls_back_after_retry_exhaustion() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_snapshot(&db, &snapshot_json(true, 80.0, "No alerts"), &json!(null)).await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&geo)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let store = std::sync::Arc::clone(monitor.store());
    wait_until(move || store.location() == LOCATION_UNAVAILABLE).await;

    monitor.disconnect().await;
}

// ── Report generation ───────────────────────────────────────────────

#[tokio::test]
async fn test_generate_live_report_appends_one_fir_log() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(true, 72.0, "Fuel Theft Detected!"),
        &json!(null),
    )
    .await;

    // Exactly one log entry per generation.
    Mock::given(method("POST"))
        .and(path("/logs.json"))
        .and(body_partial_json(json!({ "eventType": "FIR Reported" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-N3" })))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let store = std::sync::Arc::clone(monitor.store());
    wait_until(move || store.location() == "MG Road, Bengaluru").await;

    let result = monitor
        .execute(Command::GenerateReport {
            source: ReportSource::Live,
        })
        .await
        .unwrap();
    let report = match result {
        CommandResult::Report(report) => *report,
        other => panic!("expected Report, got {other:?}"),
    };

    assert_eq!(report.incident_type, "Fuel Theft Detected!");
    assert_eq!(report.location, "MG Road, Bengaluru");
    assert_eq!(report.fuel_level, Some(72.0));
    assert_eq!(report.stopped, Some(true));
    assert!(
        report.description.contains("Fuel level difference: 8 units"),
        "description missing difference: {}",
        report.description
    );

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_generate_report_from_stored_entry_uses_captured_state() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(
        &db,
        &snapshot_json(false, 90.0, "No alerts"),
        &json!({
            "a": {
                "timestamp": "2026-03-01T10:15:00Z",
                "eventType": "Fuel Theft Detected",
                "location": "Brigade Road, Bengaluru",
                "carStatus": {
                    "ignition": false,
                    "speed": 0.0,
                    "stopped": true,
                    "latitude": "12.9716° N",
                    "longitude": "77.5946° E"
                },
                "sensorData": { "fuel_level": 62.0, "humidity": 45.0, "temperature": 28.0 }
            },
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/logs.json"))
        .and(body_partial_json(json!({ "eventType": "FIR Reported" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-N4" })))
        .expect(1)
        .mount(&db)
        .await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let entry = monitor.store().theft_logs()[0].as_ref().clone();
    let result = monitor
        .execute(Command::GenerateReport {
            source: ReportSource::Entry(Box::new(entry)),
        })
        .await
        .unwrap();
    let report = match result {
        CommandResult::Report(report) => *report,
        other => panic!("expected Report, got {other:?}"),
    };

    // The report carries the entry's captured state, not the live
    // snapshot (vehicle is currently running with 90.0 fuel).
    assert_eq!(report.incident_type, "Fuel Theft Detected");
    assert_eq!(report.location, "Brigade Road, Bengaluru");
    assert_eq!(report.fuel_level, Some(62.0));
    assert_eq!(report.stopped, Some(true));
    assert_eq!(
        report.incident_time,
        "2026-03-01T10:15:00Z"
            .parse::<chrono::DateTime<chrono::Utc>>()
            .unwrap()
    );

    monitor.disconnect().await;
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_execute_before_connect_is_rejected() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;

    let monitor = Monitor::new(config(&db, &geo));
    let err = monitor.execute(Command::StartMonitoring).await.unwrap_err();
    assert!(err.to_string().contains("disconnected") || err.to_string().contains("Disconnected"));
}

#[tokio::test]
async fn test_reconnect_restarts_location_worker() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(true, 80.0, "No alerts"), &json!(null)).await;

    let monitor = Monitor::new(config(&db, &geo));
    monitor.connect().await.unwrap();

    let store = std::sync::Arc::clone(monitor.store());
    wait_until(move || store.location() == "MG Road, Bengaluru").await;

    monitor.disconnect().await;

    // A second session must spawn a fresh worker; a changed display
    // name proves the lookup actually ran after the reconnect.
    geo.reset().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "display_name": "Brigade Road, Bengaluru" })),
        )
        .mount(&geo)
        .await;

    monitor.connect().await.unwrap();

    let store = std::sync::Arc::clone(monitor.store());
    wait_until(move || store.location() == "Brigade Road, Bengaluru").await;

    monitor.disconnect().await;
}

#[tokio::test]
async fn test_oneshot_connects_and_disconnects() {
    let db = MockServer::start().await;
    let geo = MockServer::start().await;
    mount_geocode_ok(&geo).await;
    mount_snapshot(&db, &snapshot_json(true, 64.0, "No alerts"), &json!(null)).await;

    let fuel = Monitor::oneshot(config(&db, &geo), |monitor| async move {
        Ok(monitor.store().sensor().map(|s| s.fuel_level))
    })
    .await
    .unwrap();

    assert_eq!(fuel, Some(64.0));
}
