// Statistics endpoints
//
// Aggregated per-device QoS figures computed by the controller.

use tracing::debug;

use crate::client::QosClient;
use crate::error::Error;
use crate::models::{PercentageList, VarietyProportion};

impl QosClient {
    /// Fetch the per-metric sample series for a device.
    ///
    /// `GET /wm/qosoverlldp/webgui/statistics/percentagelist/{device}/json`
    pub async fn get_percentage_list(&self, device: &str) -> Result<PercentageList, Error> {
        let url = self.webgui_url(&["statistics", "percentagelist", device])?;
        debug!(device, "fetching percentage list");
        self.get_json(url).await
    }

    /// Fetch the per-metric volatility proportions for a device.
    ///
    /// `GET /wm/qosoverlldp/webgui/statistics/varietyproportion/{device}/json`
    pub async fn get_variety_proportion(&self, device: &str) -> Result<VarietyProportion, Error> {
        let url = self.webgui_url(&["statistics", "varietyproportion", device])?;
        debug!(device, "fetching variety proportion");
        self.get_json(url).await
    }
}
