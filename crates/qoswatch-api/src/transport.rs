// Shared transport configuration for building reqwest::Client instances.
//
// Keeps TLS, timeout, and user-agent settings in one place so the client
// and any ad-hoc callers build identical HTTP stacks.

use std::path::PathBuf;
use std::time::Duration;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed lab controllers).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(1),
        }
    }
}

impl TransportConfig {
    /// Config with the given per-request timeout and default TLS handling.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("qoswatch/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let transport = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/qoswatch-ca.pem")),
            ..TransportConfig::default()
        };
        match transport.build_client() {
            Err(Error::Tls(msg)) => assert!(msg.contains("failed to read CA cert"), "{msg}"),
            other => panic!("expected TLS error, got {other:?}"),
        }
    }

    #[test]
    fn insecure_mode_builds_a_client() {
        let transport = TransportConfig {
            tls: TlsMode::DangerAcceptInvalid,
            ..TransportConfig::default()
        };
        assert!(transport.build_client().is_ok());
    }
}
