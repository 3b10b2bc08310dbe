// Web GUI API HTTP client
//
// Wraps `reqwest::Client` with controller-specific URL construction and
// status/payload handling. Endpoint groups (statistics, history, ports)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Path segments every web GUI route lives under.
const WEBGUI_PREFIX: [&str; 3] = ["wm", "qosoverlldp", "webgui"];

/// Format suffix appended to every web GUI route.
const FORMAT_SUFFIX: &str = "json";

/// Longest body excerpt carried in error messages.
const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the controller's web GUI statistics API.
///
/// All routes have the shape `{base}/wm/qosoverlldp/webgui/{route...}/json`.
/// Path parameters are percent-encoded as individual segments, so a device
/// label can never escape its segment.
#[derive(Debug, Clone)]
pub struct QosClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl QosClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout this client was built with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full web GUI URL: `{base}/wm/qosoverlldp/webgui/{segments...}/json`.
    pub(crate) fn webgui_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(WEBGUI_PREFIX);
            path.extend(segments);
            path.push(FORMAT_SUFFIX);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body_preview: preview(&body),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
