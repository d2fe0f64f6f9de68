use thiserror::Error;

/// Top-level error type for the `fuelwatch-api` crate.
///
/// Covers every failure mode across both API surfaces: the telemetry
/// store's REST endpoints and the reverse-geocoding service.
/// `fuelwatch-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Telemetry store ─────────────────────────────────────────────
    /// The store rejected the request (missing or invalid auth token).
    #[error("Permission denied by telemetry store: {message}")]
    PermissionDenied { message: String },

    /// Non-success response from the store with the body preserved.
    #[error("Telemetry store error (HTTP {status}): {message}")]
    Database { status: u16, message: String },

    // ── Geocoding ───────────────────────────────────────────────────
    /// The geocoding service answered but the payload had no usable
    /// display name.
    #[error("Geocoding response missing display name")]
    GeocodeEmpty,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Database { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the store denied access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
