// qoswatch-api: Async Rust client for the QoS-over-LLDP controller web GUI API

pub mod client;
pub mod error;
pub mod history;
pub mod models;
pub mod ports;
pub mod statistics;
pub mod transport;

pub use client::QosClient;
pub use error::Error;
pub use models::{DeviceQosHistoryList, Label, PercentageList, VarietyProportion};
pub use transport::{TlsMode, TransportConfig};
