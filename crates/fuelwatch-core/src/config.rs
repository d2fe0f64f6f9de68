// ── Runtime connection configuration ──
//
// Describes *how* to reach the telemetry store and the geocoding
// service. Carries credential data and connection tuning, but never
// touches disk -- the CLI constructs a `MonitorConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use fuelwatch_api::RetryPolicy;

/// Configuration for a single monitor session.
///
/// Built by the CLI (from config file + flags), passed to
/// [`Monitor`](crate::Monitor) -- core never reads config files.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Telemetry store root URL (e.g. `https://fleet-demo.firebaseio.com`).
    pub database_url: Url,
    /// Optional store auth token, attached to every request.
    pub auth_token: Option<SecretString>,
    /// Reverse-geocoding service root URL.
    pub geocode_url: Url,
    /// Retry policy for location lookups.
    pub geocode_retry: RetryPolicy,
    /// Officer name stamped on generated incident reports.
    pub officer: String,
    /// How often to refresh from the store (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// Request timeout.
    pub timeout: Duration,
    /// Accept self-signed TLS certificates (self-hosted stores).
    pub insecure_tls: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            database_url: "https://fleet-demo.firebaseio.com"
                .parse()
                .expect("static URL"),
            auth_token: None,
            geocode_url: "https://nominatim.openstreetmap.org"
                .parse()
                .expect("static URL"),
            geocode_retry: RetryPolicy::default(),
            officer: "Duty Officer".into(),
            refresh_interval_secs: 10,
            timeout: Duration::from_secs(30),
            insecure_tls: false,
        }
    }
}

impl MonitorConfig {
    /// Build the shared transport settings for both HTTP clients.
    pub(crate) fn transport(&self) -> fuelwatch_api::TransportConfig {
        fuelwatch_api::TransportConfig {
            tls: if self.insecure_tls {
                fuelwatch_api::TlsMode::DangerAcceptInvalid
            } else {
                fuelwatch_api::TlsMode::System
            },
            timeout: self.timeout,
        }
    }
}
