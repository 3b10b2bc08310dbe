use thiserror::Error;

/// Top-level error type for the `qoswatch-api` crate.
///
/// Covers every failure mode of the web GUI statistics endpoints:
/// transport, HTTP status, and payload decoding. `qoswatch-core` maps
/// these into its own `FetchError` kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The controller base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response from the controller.
    #[error("HTTP {status}: {body_preview}")]
    Status { status: u16, body_preview: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn status_404_is_not_found() {
        let err = Error::Status {
            status: 404,
            body_preview: "missing".into(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn other_failures_are_not_not_found() {
        let server = Error::Status {
            status: 503,
            body_preview: String::new(),
        };
        let decode = Error::Deserialization {
            message: "expected array".into(),
            body: "{}".into(),
        };
        assert!(!server.is_not_found());
        assert!(!decode.is_not_found());
    }
}
