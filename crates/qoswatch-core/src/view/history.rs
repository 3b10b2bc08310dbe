// ── History view ──

use std::future::Future;

use crate::error::FetchError;
use crate::metrics::MetricsClient;
use crate::model::{DeviceId, HistoryTable, MetricKind, PerMetric};
use crate::view::{View, ViewKind, caption};

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub time: String,
    pub values: PerMetric<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFrame {
    pub device: DeviceId,
    pub caption: String,
    /// `[device, bandwidth, delay, jitter, loss, latency]`
    pub header: Vec<String>,
    /// Newest first.
    pub rows: Vec<HistoryRow>,
}

pub struct HistoryView;

impl View for HistoryView {
    type Data = HistoryTable;
    type Frame = HistoryFrame;

    const KIND: ViewKind = ViewKind::History;

    fn fetch<'a>(
        client: &'a MetricsClient,
        device: &'a DeviceId,
    ) -> impl Future<Output = Result<HistoryTable, FetchError>> + Send + 'a {
        client.fetch_history(device)
    }

    fn render(device: &DeviceId, data: HistoryTable) -> Result<HistoryFrame, FetchError> {
        let header = std::iter::once(device.to_string())
            .chain(MetricKind::ALL.iter().map(|k| k.label().to_owned()))
            .collect();

        let rows = data
            .newest_first()
            .map(|record| HistoryRow {
                time: record.time.clone(),
                values: record.values,
            })
            .collect();

        Ok(HistoryFrame {
            device: device.clone(),
            caption: caption(device, "data — table"),
            header,
            rows,
        })
    }
}
