// Wire models for the web GUI statistics endpoints.
//
// Field names follow the controller's JSON exactly; the history payload
// uses `visual*` prefixes for most columns but a bare `loss`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-metric sample arrays from `statistics/percentagelist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageList {
    #[serde(default)]
    pub bandwidth: Vec<f64>,
    #[serde(default)]
    pub delay: Vec<f64>,
    #[serde(default)]
    pub jitter: Vec<f64>,
    #[serde(default)]
    pub loss: Vec<f64>,
    #[serde(default)]
    pub latency: Vec<f64>,
}

/// Per-metric volatility shares from `statistics/varietyproportion`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VarietyProportion {
    pub bandwidth: f64,
    pub delay: f64,
    pub jitter: f64,
    pub loss: f64,
    pub latency: f64,
}

/// Column-oriented history from `deviceqoshistorylist`, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceQosHistoryList {
    #[serde(rename = "visualtime", default)]
    pub time: Vec<String>,
    #[serde(rename = "visualbandwidth", default)]
    pub bandwidth: Vec<f64>,
    #[serde(rename = "visualdelay", default)]
    pub delay: Vec<f64>,
    #[serde(rename = "visualjitter", default)]
    pub jitter: Vec<f64>,
    #[serde(default)]
    pub loss: Vec<f64>,
    #[serde(rename = "visuallatency", default)]
    pub latency: Vec<f64>,
}

/// A switch or port identifier as the controller reports it.
///
/// Port lists come back as JSON numbers, but some controller builds
/// stringify them; both decode to the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(u64),
    Text(String),
}

impl Label {
    /// Numeric value, if the label is (or parses as) an unsigned integer.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}
