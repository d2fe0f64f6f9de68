// ── Core error types ──
//
// User-facing errors from fuelwatch-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<fuelwatch_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach telemetry store at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Telemetry store denied access: {message}")]
    PermissionDenied { message: String },

    #[error("Monitor disconnected")]
    Disconnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No telemetry snapshot received yet")]
    NoSnapshot,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fuelwatch_api::Error> for CoreError {
    fn from(err: fuelwatch_api::Error) -> Self {
        match err {
            fuelwatch_api::Error::PermissionDenied { message } => {
                CoreError::PermissionDenied { message }
            }
            fuelwatch_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(u16::from),
                    }
                }
            }
            fuelwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fuelwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fuelwatch_api::Error::Database { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            fuelwatch_api::Error::GeocodeEmpty => {
                CoreError::Internal("geocoding response missing display name".into())
            }
            fuelwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
