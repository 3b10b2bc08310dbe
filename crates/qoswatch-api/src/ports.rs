use crate::client::QosClient;
use crate::error::Error;
use crate::models::Label;

impl QosClient {
    /// List the port ids the controller knows for a switch.
    ///
    /// `GET /wm/qosoverlldp/webgui/getportidlistbyswicthid/{switch}/json`
    ///
    /// The controller serializes a set, so the order is unspecified.
    pub async fn get_port_ids(&self, switch_id: &str) -> Result<Vec<Label>, Error> {
        // Route name is misspelled on the controller side.
        let url = self.webgui_url(&["getportidlistbyswicthid", switch_id])?;
        self.get_json(url).await
    }
}
