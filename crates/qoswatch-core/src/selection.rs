// ── Device selection ──
//
// Holds the two selector values (switch, port) in a watch channel so the
// scheduler can react to changes and the views can re-check the current
// device when a fetch completes.

use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::DeviceId;

/// Raw selector values, trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorValues {
    pub switch: String,
    pub port: String,
}

impl SelectorValues {
    pub fn new(switch: &str, port: &str) -> Self {
        Self {
            switch: switch.trim().to_owned(),
            port: port.trim().to_owned(),
        }
    }

    pub fn device_id(&self) -> Result<DeviceId, CoreError> {
        DeviceId::new(&self.switch, &self.port)
    }
}

/// The operator's current switch/port choice.
#[derive(Debug)]
pub struct DeviceSelection {
    tx: watch::Sender<SelectorValues>,
}

impl Default for DeviceSelection {
    fn default() -> Self {
        Self::new(SelectorValues::default())
    }
}

impl DeviceSelection {
    pub fn new(initial: SelectorValues) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of both selector values.
    pub fn values(&self) -> SelectorValues {
        self.tx.borrow().clone()
    }

    /// The device both selectors currently name.
    pub fn current_device_id(&self) -> Result<DeviceId, CoreError> {
        self.tx.borrow().device_id()
    }

    /// Replace the switch value. Returns `true` if it changed.
    pub fn set_switch(&self, switch: &str) -> bool {
        let switch = switch.trim();
        self.tx.send_if_modified(|values| {
            if values.switch == switch {
                return false;
            }
            switch.clone_into(&mut values.switch);
            true
        })
    }

    /// Replace the port value. Returns `true` if it changed.
    pub fn set_port(&self, port: &str) -> bool {
        let port = port.trim();
        self.tx.send_if_modified(|values| {
            if values.port == port {
                return false;
            }
            port.clone_into(&mut values.port);
            true
        })
    }

    /// Replace both values with a single change notification.
    pub fn set(&self, switch: &str, port: &str) -> bool {
        let next = SelectorValues::new(switch, port);
        self.tx.send_if_modified(|values| {
            if *values == next {
                return false;
            }
            *values = next;
            true
        })
    }

    /// Receiver notified on every effective change.
    pub fn subscribe(&self) -> watch::Receiver<SelectorValues> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_not_ready() {
        let selection = DeviceSelection::default();
        assert_eq!(
            selection.current_device_id(),
            Err(CoreError::SelectionNotReady)
        );

        selection.set_switch("1");
        assert_eq!(
            selection.current_device_id(),
            Err(CoreError::SelectionNotReady)
        );

        selection.set_port("2");
        assert_eq!(
            selection.current_device_id().unwrap().to_string(),
            "s1-eth2"
        );
    }

    #[test]
    fn unchanged_values_do_not_notify() {
        let selection = DeviceSelection::new(SelectorValues::new("1", "2"));
        let rx = selection.subscribe();

        assert!(!selection.set_switch(" 1 "));
        assert!(!selection.set("1", "2"));
        assert!(!rx.has_changed().unwrap());

        assert!(selection.set_port("3"));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn set_replaces_both_at_once() {
        let selection = DeviceSelection::default();
        let mut rx = selection.subscribe();

        assert!(selection.set("4", "7"));
        assert_eq!(
            *rx.borrow_and_update(),
            SelectorValues {
                switch: "4".into(),
                port: "7".into()
            }
        );
        assert!(!rx.has_changed().unwrap());
    }
}
