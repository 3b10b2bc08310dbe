// ── Core error types ──
//
// Errors surfaced by qoswatch-core. Consumers never see reqwest or serde
// errors directly: the `From<qoswatch_api::Error>` impls fold transport
// failures into the four fetch kinds the views record on their surfaces.

use thiserror::Error;

/// Why a single backend read failed.
///
/// `Clone` so that every waiter joined onto one in-flight refresh can
/// receive the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {message}")]
    Malformed { message: String },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl FetchError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Short label for status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Status { .. } => "status",
            Self::Malformed { .. } => "malformed",
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Selection ────────────────────────────────────────────────────
    #[error("No device selected: switch and port must both be set")]
    SelectionNotReady,

    #[error("Invalid device identifier: {input:?} (expected s<switch>-eth<port>)")]
    InvalidDeviceId { input: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error(transparent)]
    Fetch(#[from] FetchError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Dashboard has been shut down")]
    ShutDown,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qoswatch_api::Error> for FetchError {
    fn from(err: qoswatch_api::Error) -> Self {
        match err {
            qoswatch_api::Error::Transport(e) => FetchError::Network {
                message: e.to_string(),
            },
            qoswatch_api::Error::InvalidUrl(e) => FetchError::Network {
                message: format!("invalid URL: {e}"),
            },
            qoswatch_api::Error::InvalidBaseUrl(url) => FetchError::Network {
                message: format!("invalid base URL: {url}"),
            },
            qoswatch_api::Error::Tls(msg) => FetchError::Network {
                message: format!("TLS error: {msg}"),
            },
            qoswatch_api::Error::Timeout { timeout_ms } => FetchError::Timeout { timeout_ms },
            qoswatch_api::Error::Status {
                status,
                body_preview,
            } => FetchError::Status {
                status,
                message: body_preview,
            },
            qoswatch_api::Error::Deserialization { message, body: _ } => {
                FetchError::Malformed { message }
            }
        }
    }
}

impl From<qoswatch_api::Error> for CoreError {
    fn from(err: qoswatch_api::Error) -> Self {
        match err {
            qoswatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            qoswatch_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            qoswatch_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            other => CoreError::Fetch(other.into()),
        }
    }
}
