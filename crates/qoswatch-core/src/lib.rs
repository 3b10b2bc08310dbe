// qoswatch-core: Selection, polling, and view synchronization between
// qoswatch-api and the terminal dashboard.

pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod model;
pub mod scheduler;
pub mod selection;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsMode};
pub use controller::DashboardController;
pub use error::{CoreError, FetchError};
pub use metrics::MetricsClient;
pub use scheduler::{RefreshScheduler, Trigger};
pub use selection::{DeviceSelection, SelectorValues};
pub use view::{RefreshOutcome, Surface, ViewKind};

pub use model::{
    DeviceId, HistoryRecord, HistoryTable, MetricKind, MetricSample, MetricSeries, PerMetric,
    ProportionSet, TrendSeries,
};
