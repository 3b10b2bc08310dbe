// ── Proportion view ──

use std::future::Future;

use crate::error::FetchError;
use crate::metrics::MetricsClient;
use crate::model::{DeviceId, MetricKind, ProportionSet};
use crate::view::{View, ViewKind, caption};

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionSlice {
    pub kind: MetricKind,
    pub label: &'static str,
    pub value: f64,
    /// Whole-number share of the total.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProportionFrame {
    pub device: DeviceId,
    pub caption: String,
    pub slices: Vec<ProportionSlice>,
    pub total: f64,
}

pub struct ProportionView;

impl View for ProportionView {
    type Data = ProportionSet;
    type Frame = ProportionFrame;

    const KIND: ViewKind = ViewKind::Proportion;

    fn fetch<'a>(
        client: &'a MetricsClient,
        device: &'a DeviceId,
    ) -> impl Future<Output = Result<ProportionSet, FetchError>> + Send + 'a {
        client.fetch_proportions(device)
    }

    fn render(device: &DeviceId, data: ProportionSet) -> Result<ProportionFrame, FetchError> {
        let percentages = data.percentages();
        let slices = MetricKind::ALL
            .into_iter()
            .map(|kind| ProportionSlice {
                kind,
                label: kind.label(),
                value: data.share(kind),
                percent: *percentages.get(kind),
            })
            .collect();

        Ok(ProportionFrame {
            device: device.clone(),
            caption: caption(device, "volatility comparison — pie chart"),
            slices,
            total: data.total(),
        })
    }
}
