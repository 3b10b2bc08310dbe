// ── QoS metrics ──

use strum::{Display, EnumString, IntoStaticStr};

use crate::error::FetchError;

/// The closed set of QoS metric kinds, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    Bandwidth,
    Delay,
    Jitter,
    Loss,
    Latency,
}

impl MetricKind {
    /// Every kind, in the fixed iteration order.
    pub const ALL: [Self; 5] = [
        Self::Bandwidth,
        Self::Delay,
        Self::Jitter,
        Self::Loss,
        Self::Latency,
    ];

    /// Lowercase name used for labels and column headers.
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// One value per metric kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerMetric<T> {
    pub bandwidth: T,
    pub delay: T,
    pub jitter: T,
    pub loss: T,
    pub latency: T,
}

impl<T> PerMetric<T> {
    pub fn get(&self, kind: MetricKind) -> &T {
        match kind {
            MetricKind::Bandwidth => &self.bandwidth,
            MetricKind::Delay => &self.delay,
            MetricKind::Jitter => &self.jitter,
            MetricKind::Loss => &self.loss,
            MetricKind::Latency => &self.latency,
        }
    }

    /// Entries in [`MetricKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, &T)> {
        MetricKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    pub fn map<U>(self, mut f: impl FnMut(MetricKind, T) -> U) -> PerMetric<U> {
        PerMetric {
            bandwidth: f(MetricKind::Bandwidth, self.bandwidth),
            delay: f(MetricKind::Delay, self.delay),
            jitter: f(MetricKind::Jitter, self.jitter),
            loss: f(MetricKind::Loss, self.loss),
            latency: f(MetricKind::Latency, self.latency),
        }
    }

    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(MetricKind, T) -> Result<U, E>,
    ) -> Result<PerMetric<U>, E> {
        Ok(PerMetric {
            bandwidth: f(MetricKind::Bandwidth, self.bandwidth)?,
            delay: f(MetricKind::Delay, self.delay)?,
            jitter: f(MetricKind::Jitter, self.jitter)?,
            loss: f(MetricKind::Loss, self.loss)?,
            latency: f(MetricKind::Latency, self.latency)?,
        })
    }
}

pub(crate) fn ensure_finite(kind: MetricKind, value: f64) -> Result<f64, FetchError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FetchError::malformed(format!(
            "{kind} contains a non-finite value"
        )))
    }
}

// ── Series ───────────────────────────────────────────────────────────

/// One scalar value at a sequence index. The index doubles as x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    pub index: u32,
    pub value: f64,
}

/// Samples for one metric kind, indexed `0..n` in retrieval order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    kind: MetricKind,
    samples: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn new(kind: MetricKind, values: Vec<f64>) -> Result<Self, FetchError> {
        let samples = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| -> Result<MetricSample, FetchError> {
                let index = u32::try_from(i)
                    .map_err(|_| FetchError::malformed(format!("{kind} series is too long")))?;
                Ok(MetricSample {
                    index,
                    value: ensure_finite(kind, value)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { kind, samples })
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One series per metric kind, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    series: PerMetric<MetricSeries>,
    len: usize,
}

impl TrendSeries {
    /// Validate raw per-metric columns.
    ///
    /// Columns of unequal length or containing NaN/infinity are rejected
    /// as malformed.
    pub fn new(columns: PerMetric<Vec<f64>>) -> Result<Self, FetchError> {
        let len = columns.bandwidth.len();
        let series = columns.try_map(|kind, values| {
            if values.len() != len {
                return Err(FetchError::malformed(format!(
                    "{kind} has {} samples, bandwidth has {len}",
                    values.len()
                )));
            }
            MetricSeries::new(kind, values)
        })?;
        Ok(Self { series, len })
    }

    pub fn get(&self, kind: MetricKind) -> &MetricSeries {
        self.series.get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter().map(|(_, series)| series)
    }

    /// Number of samples in every series.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ── Proportions ──────────────────────────────────────────────────────

/// One non-negative share per metric kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionSet {
    shares: PerMetric<f64>,
}

impl ProportionSet {
    pub fn new(shares: PerMetric<f64>) -> Result<Self, FetchError> {
        let shares = shares.try_map(|kind, value| {
            let value = ensure_finite(kind, value)?;
            if value < 0.0 {
                return Err(FetchError::malformed(format!(
                    "{kind} proportion is negative"
                )));
            }
            Ok(value)
        })?;
        Ok(Self { shares })
    }

    pub fn share(&self, kind: MetricKind) -> f64 {
        *self.shares.get(kind)
    }

    pub fn shares(&self) -> &PerMetric<f64> {
        &self.shares
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|(_, v)| *v).sum()
    }

    /// Each share as a whole percentage of the total.
    ///
    /// An all-zero set yields all zeros rather than NaN.
    pub fn percentages(&self) -> PerMetric<f64> {
        let total = self.total();
        self.shares.map(|_, value| {
            if total > 0.0 {
                (value / total * 100.0).round()
            } else {
                0.0
            }
        })
    }
}
