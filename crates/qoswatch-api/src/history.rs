use crate::client::QosClient;
use crate::error::Error;
use crate::models::DeviceQosHistoryList;

impl QosClient {
    /// Fetch the timestamped QoS history for a device, oldest first.
    ///
    /// `GET /wm/qosoverlldp/webgui/deviceqoshistorylist/{device}/json`
    pub async fn get_device_qos_history_list(
        &self,
        device: &str,
    ) -> Result<DeviceQosHistoryList, Error> {
        let url = self.webgui_url(&["deviceqoshistorylist", device])?;
        self.get_json(url).await
    }
}
