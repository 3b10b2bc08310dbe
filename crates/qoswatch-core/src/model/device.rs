// ── Device identity ──
//
// A device is one switch port. The backend keys every query by the
// canonical `s<switch>-eth<port>` form.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Composite switch + port identifier.
///
/// Both labels are trimmed and non-empty. Recomputed from the selectors,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId {
    switch: String,
    port: String,
}

impl DeviceId {
    /// Build an id from raw selector values.
    ///
    /// Blank values yield [`CoreError::SelectionNotReady`].
    pub fn new(switch: &str, port: &str) -> Result<Self, CoreError> {
        let (switch, port) = (switch.trim(), port.trim());
        if switch.is_empty() || port.is_empty() {
            return Err(CoreError::SelectionNotReady);
        }
        Ok(Self {
            switch: switch.to_owned(),
            port: port.to_owned(),
        })
    }

    pub fn switch(&self) -> &str {
        &self.switch
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}-eth{}", self.switch, self.port)
    }
}

impl FromStr for DeviceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidDeviceId { input: s.to_owned() };
        let (switch, port) = s
            .trim()
            .strip_prefix('s')
            .and_then(|rest| rest.rsplit_once("-eth"))
            .ok_or_else(invalid)?;
        Self::new(switch, port).map_err(|_| invalid())
    }
}
