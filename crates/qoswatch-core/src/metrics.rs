// ── Metrics client ──
//
// Typed, validated reads over the raw web GUI client. Each read is
// bounded by the configured timeout; dropping the returned future
// cancels it.

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use qoswatch_api::{Label, QosClient, TransportConfig};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::{CoreError, FetchError};
use crate::model::{DeviceId, HistoryTable, PerMetric, ProportionSet, TrendSeries};

/// Read-only access to the backend's QoS statistics.
///
/// Cheaply cloneable; clones share one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    api: Arc<QosClient>,
    timeout: Duration,
}

impl MetricsClient {
    /// Build a client for the configured backend.
    pub fn new(config: &DashboardConfig) -> Result<Self, CoreError> {
        let timeout = config.fetch_timeout();
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout,
        };
        let api = QosClient::new(config.base_url.clone(), &transport)?;
        Ok(Self::from_client(api, timeout))
    }

    /// Wrap an existing raw client.
    pub fn from_client(api: QosClient, timeout: Duration) -> Self {
        Self {
            api: Arc::new(api),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Per-metric sample series, raw (no presentation offsets).
    pub async fn fetch_trend_series(&self, device: &DeviceId) -> Result<TrendSeries, FetchError> {
        let device = device.to_string();
        let list = self.bounded(self.api.get_percentage_list(&device)).await?;
        TrendSeries::new(PerMetric {
            bandwidth: list.bandwidth,
            delay: list.delay,
            jitter: list.jitter,
            loss: list.loss,
            latency: list.latency,
        })
    }

    /// Per-metric volatility shares.
    pub async fn fetch_proportions(&self, device: &DeviceId) -> Result<ProportionSet, FetchError> {
        let device = device.to_string();
        let prop = self
            .bounded(self.api.get_variety_proportion(&device))
            .await?;
        ProportionSet::new(PerMetric {
            bandwidth: prop.bandwidth,
            delay: prop.delay,
            jitter: prop.jitter,
            loss: prop.loss,
            latency: prop.latency,
        })
    }

    /// Timestamped history, oldest first.
    pub async fn fetch_history(&self, device: &DeviceId) -> Result<HistoryTable, FetchError> {
        let device = device.to_string();
        let list = self
            .bounded(self.api.get_device_qos_history_list(&device))
            .await?;
        HistoryTable::from_columns(
            list.time,
            PerMetric {
                bandwidth: list.bandwidth,
                delay: list.delay,
                jitter: list.jitter,
                loss: list.loss,
                latency: list.latency,
            },
        )
    }

    /// Port ids known for a switch, numeric ids first in ascending order.
    pub async fn fetch_port_ids(&self, switch_id: &str) -> Result<Vec<String>, FetchError> {
        let mut labels = self.bounded(self.api.get_port_ids(switch_id.trim())).await?;
        labels.sort_by(compare_labels);
        let mut ports: Vec<String> = labels.iter().map(ToString::to_string).collect();
        ports.dedup();
        debug!(switch = switch_id, count = ports.len(), "port list fetched");
        Ok(ports)
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, qoswatch_api::Error>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(FetchError::from),
            Err(_) => Err(FetchError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

fn compare_labels(a: &Label, b: &Label) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    }
}
