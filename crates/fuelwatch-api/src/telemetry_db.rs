// Telemetry store HTTP client
//
// Wraps `reqwest::Client` with the hosted realtime database's REST
// conventions: every node is addressable as `{base}/{path}.json`,
// PATCH carries merge-patch semantics, POST appends a child under an
// auto-generated key, DELETE removes a whole subtree. Absent nodes
// come back as the JSON literal `null`.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Response body for an append (`POST`): the server-generated child key.
#[derive(Debug, serde::Deserialize)]
struct PushResponse {
    name: String,
}

/// Error body shape used by the store for rejected requests.
#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Raw HTTP client for the hosted telemetry store.
///
/// All methods address nodes by slash-separated path relative to the
/// database root (`""` is the root document). The optional auth token
/// is attached as the `auth` query parameter on every request.
pub struct TelemetryDb {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<SecretString>,
}

impl TelemetryDb {
    /// Create a new store client from a `TransportConfig`.
    ///
    /// The `base_url` is the database root, e.g.
    /// `https://vehicle-telemetry.firebaseio.com`.
    pub fn new(
        base_url: Url,
        auth: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// The store base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the REST URL for a node path: `{base}/{path}.json`.
    ///
    /// The root document is addressed with an empty path (`{base}/.json`).
    fn node_url(&self, path: &str) -> Result<Url, Error> {
        let trimmed = path.trim_matches('/');
        let full = format!(
            "{}/{}.json",
            self.base_url.as_str().trim_end_matches('/'),
            trimmed
        );
        let mut url = Url::parse(&full)?;
        if let Some(ref token) = self.auth {
            url.query_pairs_mut()
                .append_pair("auth", token.expose_secret());
        }
        Ok(url)
    }

    // ── Node operations ──────────────────────────────────────────────

    /// Read a node. Returns `None` if the node does not exist (the
    /// store answers `null` for absent paths).
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.node_url(path)?;
        debug!(%path, "GET node");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let body = Self::check_status(resp).await?;

        serde_json::from_str::<Option<T>>(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Merge-patch a node: only the fields present in `body` are
    /// written, siblings are left untouched.
    pub async fn patch(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let url = self.node_url(path)?;
        debug!(%path, "PATCH node");

        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Append a child under `path` with a server-generated key.
    /// Returns the new key.
    pub async fn push(&self, path: &str, body: &impl Serialize) -> Result<String, Error> {
        let url = self.node_url(path)?;
        debug!(%path, "POST child");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = Self::check_status(resp).await?;

        let pushed: PushResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(pushed.name)
    }

    /// Delete a node and everything beneath it.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.node_url(path)?;
        debug!(%path, "DELETE node");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map a non-success status to an error, extracting the store's
    /// `{ "error": "..." }` body shape when present. Returns the raw
    /// body text on success.
    async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status.is_success() {
            return Ok(body);
        }

        let message =
            serde_json::from_str::<ErrorResponse>(&body).map_or_else(|_| body.clone(), |e| e.error);

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::PermissionDenied { message });
        }

        Err(Error::Database {
            status: status.as_u16(),
            message,
        })
    }
}
