// ── QoS history ──

use crate::error::FetchError;
use crate::model::metric::{PerMetric, ensure_finite};

/// One timestamped row of metric values.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub time: String,
    pub values: PerMetric<f64>,
}

/// History rows as retrieved: oldest first, newest last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    records: Vec<HistoryRecord>,
}

impl HistoryTable {
    /// Zip column-oriented backend arrays into rows.
    ///
    /// Every column must have as many entries as `time`.
    pub fn from_columns(time: Vec<String>, values: PerMetric<Vec<f64>>) -> Result<Self, FetchError> {
        let len = time.len();
        for (kind, column) in values.iter() {
            if column.len() != len {
                return Err(FetchError::malformed(format!(
                    "history {kind} has {} entries, time has {len}",
                    column.len()
                )));
            }
        }

        let mut columns = values.map(|_, column| column.into_iter());
        let mut records = Vec::with_capacity(len);
        for time in time {
            let values = PerMetric {
                bandwidth: columns.bandwidth.next(),
                delay: columns.delay.next(),
                jitter: columns.jitter.next(),
                loss: columns.loss.next(),
                latency: columns.latency.next(),
            }
            .try_map(|kind, value| {
                value
                    .ok_or_else(|| FetchError::malformed(format!("history {kind} ended early")))
                    .and_then(|v| ensure_finite(kind, v))
            })?;
            records.push(HistoryRecord { time, values });
        }
        Ok(Self { records })
    }

    /// Rows in retrieval order.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Rows newest first, the order they are displayed in.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
