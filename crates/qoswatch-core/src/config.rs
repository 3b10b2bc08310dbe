// ── Runtime dashboard configuration ──
//
// Describes which backend to poll and how often. Never touches disk:
// the TUI (via qoswatch-config) builds a `DashboardConfig` and hands it in.

use std::time::Duration;

pub use qoswatch_api::TlsMode;
use url::Url;

/// Default polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend controller root (e.g., `http://127.0.0.1:8080`).
    pub base_url: Url,
    /// Period of the refresh timer.
    pub poll_interval: Duration,
    /// Bound on each backend read. `None` means "same as `poll_interval`".
    pub fetch_timeout: Option<Duration>,
    /// Initial switch selector value.
    pub switch_id: Option<String>,
    /// Initial port selector value.
    pub port_id: Option<String>,
    /// Certificate verification for `https` backends.
    pub tls: TlsMode,
}

impl DashboardConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: None,
            switch_id: None,
            port_id: None,
            tls: TlsMode::System,
        }
    }

    /// Effective per-fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout.unwrap_or(self.poll_interval)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_poll_interval() {
        let mut config = DashboardConfig::new(Url::parse("http://ctl:8080").unwrap());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(1));

        config.poll_interval = Duration::from_millis(2500);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(2500));

        config.fetch_timeout = Some(Duration::from_millis(300));
        assert_eq!(config.fetch_timeout(), Duration::from_millis(300));
    }
}
