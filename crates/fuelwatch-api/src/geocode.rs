// Reverse-geocoding client
//
// Single-shot lookups against a nominatim-style endpoint:
// `GET {base}/reverse?lat={lat}&lon={lon}&format=json`, answering a
// free-text `display_name`. The retry loop lives with the caller
// (fuelwatch-core's location worker) so interim state can be published
// between attempts; this module only defines the policy type.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Retry policy for location lookups: a fixed number of attempts with
/// a fixed delay between them. Parameterized so tests can run with a
/// zero-delay policy against a mock endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no delay. Used by tests and one-shot CLI calls.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

/// Response body from the reverse endpoint. Only `display_name` is
/// consumed; the rest of the payload is ignored.
#[derive(Debug, serde::Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// HTTP client for a reverse-geocoding service.
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Create a new geocoding client. The `base_url` is the service
    /// root, e.g. `https://nominatim.openstreetmap.org`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Perform a single reverse lookup for the given coordinates.
    ///
    /// Returns the service's free-text display name, or
    /// [`Error::GeocodeEmpty`] when the service answered without one.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, Error> {
        let mut url = self.base_url.join("reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("format", "json");

        debug!(latitude, longitude, "reverse geocode lookup");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Database {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        parsed.display_name.ok_or(Error::GeocodeEmpty)
    }
}
