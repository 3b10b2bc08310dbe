// ── Views ──
//
// Each view turns one backend read into a render-ready frame and publishes
// it on a watch channel it alone owns (its surface). `LiveView` carries
// the refresh discipline shared by all three: one refresh in flight per
// view, joined by same-device triggers, cancelled by a device change, and
// applied only while it is still the newest refresh for the device that
// is still selected.

pub mod history;
pub mod proportion;
pub mod trend;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use strum::Display;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::metrics::MetricsClient;
use crate::model::DeviceId;
use crate::selection::SelectorValues;

pub use history::{HistoryFrame, HistoryRow, HistoryView};
pub use proportion::{ProportionFrame, ProportionSlice, ProportionView};
pub use trend::{TrendFrame, TrendLine, TrendView};

/// Which of the three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViewKind {
    Trend,
    Proportion,
    History,
}

impl ViewKind {
    pub const ALL: [Self; 3] = [Self::Trend, Self::Proportion, Self::History];
}

/// A fetch-and-render strategy for one view.
pub trait View: Send + Sync + 'static {
    type Data: Send + 'static;
    type Frame: Send + Sync + 'static;

    const KIND: ViewKind;

    fn fetch<'a>(
        client: &'a MetricsClient,
        device: &'a DeviceId,
    ) -> impl Future<Output = Result<Self::Data, FetchError>> + Send + 'a;

    /// Build the frame for `device`. Must be pure.
    fn render(device: &DeviceId, data: Self::Data) -> Result<Self::Frame, FetchError>;
}

// ── Surface ──────────────────────────────────────────────────────────

/// What a view currently displays.
#[derive(Debug)]
pub struct Surface<F> {
    /// Device the surface belongs to. Set as soon as a refresh for a new
    /// device starts, at which point any older frame is dropped.
    pub device: Option<DeviceId>,
    /// Last frame successfully rendered for `device`.
    pub frame: Option<Arc<F>>,
    /// Most recent failure for `device`, cleared by the next success.
    pub error: Option<FetchError>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl<F> Default for Surface<F> {
    fn default() -> Self {
        Self {
            device: None,
            frame: None,
            error: None,
            refreshed_at: None,
        }
    }
}

impl<F> Clone for Surface<F> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
            frame: self.frame.clone(),
            error: self.error.clone(),
            refreshed_at: self.refreshed_at,
        }
    }
}

// ── Refresh ──────────────────────────────────────────────────────────

/// How a single refresh ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new frame was published.
    Applied,
    /// The fetch failed; the surface keeps its last good frame.
    Failed(FetchError),
    /// The result arrived for a device or generation that is no longer
    /// current and was dropped.
    Discarded,
    /// Cancelled before completion (device change or shutdown).
    Cancelled,
    /// Nothing was issued because no device is selected.
    Skipped,
}

struct InFlight {
    device: DeviceId,
    generation: u64,
    cancel: CancellationToken,
    outcome: Shared<BoxFuture<'static, RefreshOutcome>>,
}

/// A view together with its surface and refresh state.
pub struct LiveView<V: View> {
    client: MetricsClient,
    selection: watch::Receiver<SelectorValues>,
    surface: watch::Sender<Surface<V::Frame>>,
    generation: AtomicU64,
    in_flight: Mutex<Option<InFlight>>,
    shutdown: CancellationToken,
    _view: PhantomData<fn() -> V>,
}

impl<V: View> LiveView<V> {
    /// `selection` is consulted when a fetch completes; `shutdown` cancels
    /// every refresh this view ever starts.
    pub fn new(
        client: MetricsClient,
        selection: watch::Receiver<SelectorValues>,
        shutdown: CancellationToken,
    ) -> Self {
        let (surface, _) = watch::channel(Surface::default());
        Self {
            client,
            selection,
            surface,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            shutdown,
            _view: PhantomData,
        }
    }

    pub fn kind(&self) -> ViewKind {
        V::KIND
    }

    /// Receiver for this view's surface.
    pub fn subscribe(&self) -> watch::Receiver<Surface<V::Frame>> {
        self.surface.subscribe()
    }

    /// Current surface contents.
    pub fn snapshot(&self) -> Surface<V::Frame> {
        self.surface.borrow().clone()
    }

    /// Refresh this view for `device`.
    ///
    /// Joins a refresh already in flight for the same device; cancels one
    /// in flight for a different device and starts anew.
    pub async fn refresh(self: &Arc<Self>, device: DeviceId) -> RefreshOutcome {
        if self.shutdown.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }

        let mut slot = self.in_flight.lock().await;
        // Checked under the slot lock: the selection may have moved on while
        // this trigger was queued or waiting for the lock.
        if !self.is_selected(&device) {
            debug!(view = %V::KIND, %device, "device no longer selected; not refreshing");
            return RefreshOutcome::Discarded;
        }
        let running = slot.as_ref().filter(|c| c.outcome.peek().is_none());

        let outcome = match running {
            Some(current) if current.device == device => {
                debug!(
                    view = %V::KIND,
                    %device,
                    generation = current.generation,
                    "joining in-flight refresh"
                );
                current.outcome.clone()
            }
            stale => {
                if let Some(stale) = stale {
                    debug!(
                        view = %V::KIND,
                        from = %stale.device,
                        to = %device,
                        "device changed; cancelling in-flight refresh"
                    );
                    stale.cancel.cancel();
                }
                let next = self.start(device);
                let outcome = next.outcome.clone();
                *slot = Some(next);
                outcome
            }
        };
        drop(slot);

        outcome.await
    }

    /// Cancel whatever refresh is in flight, leaving the surface as is.
    pub async fn cancel_in_flight(&self) {
        if let Some(current) = self.in_flight.lock().await.take() {
            current.cancel.cancel();
        }
    }

    fn start(self: &Arc<Self>, device: DeviceId) -> InFlight {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = self.shutdown.child_token();

        self.surface.send_if_modified(|surface| {
            if surface.device.as_ref() == Some(&device) {
                return false;
            }
            *surface = Surface {
                device: Some(device.clone()),
                ..Surface::default()
            };
            true
        });

        let this = Arc::clone(self);
        let run_device = device.clone();
        let run_cancel = cancel.clone();
        let outcome = async move { this.run(run_device, generation, run_cancel).await }
            .boxed()
            .shared();

        // Drive the refresh to completion even if every caller stops waiting.
        tokio::spawn(outcome.clone());

        InFlight {
            device,
            generation,
            cancel,
            outcome,
        }
    }

    async fn run(
        &self,
        device: DeviceId,
        generation: u64,
        cancel: CancellationToken,
    ) -> RefreshOutcome {
        debug!(view = %V::KIND, %device, generation, "refresh issued");

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(view = %V::KIND, %device, generation, "refresh cancelled");
                return RefreshOutcome::Cancelled;
            }
            result = V::fetch(&self.client, &device) => result,
        };

        if cancel.is_cancelled() || !self.is_current(&device, generation) {
            debug!(view = %V::KIND, %device, generation, "discarding stale result");
            return RefreshOutcome::Discarded;
        }

        match result.and_then(|data| V::render(&device, data)) {
            Ok(frame) => {
                let frame = Arc::new(frame);
                self.surface.send_modify(|surface| {
                    surface.device = Some(device.clone());
                    surface.frame = Some(frame);
                    surface.error = None;
                    surface.refreshed_at = Some(Utc::now());
                });
                debug!(view = %V::KIND, %device, generation, "refresh applied");
                RefreshOutcome::Applied
            }
            Err(e) => {
                warn!(view = %V::KIND, %device, error = %e, "refresh failed; keeping last frame");
                self.surface.send_modify(|surface| {
                    if surface.device.as_ref() != Some(&device) {
                        surface.frame = None;
                        surface.device = Some(device.clone());
                    }
                    surface.error = Some(e.clone());
                });
                RefreshOutcome::Failed(e)
            }
        }
    }

    fn is_current(&self, device: &DeviceId, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation && self.is_selected(device)
    }

    fn is_selected(&self, device: &DeviceId) -> bool {
        self.selection.borrow().device_id().ok().as_ref() == Some(device)
    }
}

/// Shared caption prefix: `Port <device> history QoS`.
pub(crate) fn caption(device: &DeviceId, suffix: &str) -> String {
    format!("Port {device} history QoS {suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use qoswatch_api::{QosClient, TransportConfig};
    use url::Url;

    use super::*;
    use crate::model::{PerMetric, TrendSeries};
    use crate::selection::DeviceSelection;

    fn unreachable_client() -> MetricsClient {
        let api = QosClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        MetricsClient::from_client(api, Duration::from_millis(50))
    }

    fn trend_frame(device: &DeviceId) -> Arc<TrendFrame> {
        let series = TrendSeries::new(PerMetric {
            bandwidth: vec![1.0],
            delay: vec![1.0],
            jitter: vec![1.0],
            loss: vec![1.0],
            latency: vec![1.0],
        })
        .unwrap();
        Arc::new(TrendView::render(device, series).unwrap())
    }

    #[tokio::test]
    async fn refresh_waiting_on_slot_skips_deselected_device() {
        let selection = DeviceSelection::new(SelectorValues::new("1", "1"));
        let view = Arc::new(LiveView::<TrendView>::new(
            unreachable_client(),
            selection.subscribe(),
            CancellationToken::new(),
        ));
        let old = DeviceId::new("1", "1").unwrap();
        let current = DeviceId::new("1", "2").unwrap();

        let slot = view.in_flight.lock().await;
        let queued = tokio::spawn({
            let view = Arc::clone(&view);
            let old = old.clone();
            async move { view.refresh(old).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        selection.set_port("2");
        let frame = trend_frame(&current);
        view.surface.send_modify(|surface| {
            surface.device = Some(current.clone());
            surface.frame = Some(Arc::clone(&frame));
        });
        drop(slot);

        assert_eq!(queued.await.unwrap(), RefreshOutcome::Discarded);
        let surface = view.snapshot();
        assert_eq!(surface.device, Some(current));
        assert!(surface.frame.is_some());
        assert!(view.in_flight.lock().await.is_none());
    }

    #[tokio::test]
    async fn refresh_for_deselected_device_is_discarded() {
        let selection = DeviceSelection::new(SelectorValues::new("1", "2"));
        let view = Arc::new(LiveView::<TrendView>::new(
            unreachable_client(),
            selection.subscribe(),
            CancellationToken::new(),
        ));

        let outcome = view.refresh(DeviceId::new("1", "1").unwrap()).await;

        assert_eq!(outcome, RefreshOutcome::Discarded);
        assert_eq!(view.snapshot().device, None);
    }
}
