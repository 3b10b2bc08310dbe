// ── Domain model ──
//
// Normalized, validated forms of what the backend reports. Every value
// here is replaced wholesale by the next successful fetch.

pub mod device;
pub mod history;
pub mod metric;

pub use device::DeviceId;
pub use history::{HistoryRecord, HistoryTable};
pub use metric::{MetricKind, MetricSample, MetricSeries, PerMetric, ProportionSet, TrendSeries};
