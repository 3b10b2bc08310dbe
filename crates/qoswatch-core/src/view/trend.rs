// ── Trend view ──
//
// Multi-series line chart. Each metric is lifted by a fixed offset so
// the five lines do not overlap on the shared [0, 150] axis.

use std::future::Future;

use crate::error::FetchError;
use crate::metrics::MetricsClient;
use crate::model::{DeviceId, MetricKind, TrendSeries};
use crate::view::{View, ViewKind, caption};

/// Fixed y-axis range.
pub const TREND_Y_BOUNDS: [f64; 2] = [0.0, 150.0];

/// Vertical offset added to every point of a metric's line.
pub fn trend_offset(kind: MetricKind) -> f64 {
    match kind {
        MetricKind::Bandwidth => 10.0,
        MetricKind::Delay => 20.0,
        MetricKind::Jitter => 30.0,
        MetricKind::Loss => 40.0,
        MetricKind::Latency => 50.0,
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub kind: MetricKind,
    /// `(index, value + offset)` pairs.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendFrame {
    pub device: DeviceId,
    pub caption: String,
    pub lines: Vec<TrendLine>,
    /// Largest x value, for the axis bound.
    pub x_max: f64,
}

impl TrendFrame {
    pub fn line(&self, kind: MetricKind) -> Option<&TrendLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

pub struct TrendView;

impl View for TrendView {
    type Data = TrendSeries;
    type Frame = TrendFrame;

    const KIND: ViewKind = ViewKind::Trend;

    fn fetch<'a>(
        client: &'a MetricsClient,
        device: &'a DeviceId,
    ) -> impl Future<Output = Result<TrendSeries, FetchError>> + Send + 'a {
        client.fetch_trend_series(device)
    }

    fn render(device: &DeviceId, data: TrendSeries) -> Result<TrendFrame, FetchError> {
        let lines = data
            .iter()
            .map(|series| {
                let offset = trend_offset(series.kind());
                TrendLine {
                    kind: series.kind(),
                    points: series
                        .samples()
                        .iter()
                        .map(|s| (f64::from(s.index), s.value + offset))
                        .collect(),
                }
            })
            .collect();

        let x_max = data
            .get(MetricKind::Bandwidth)
            .samples()
            .last()
            .map_or(0.0, |s| f64::from(s.index));

        Ok(TrendFrame {
            device: device.clone(),
            caption: caption(device, "trend — line chart"),
            lines,
            x_max,
        })
    }
}
