// ── Dashboard controller ──
//
// Composes selection, metrics client, the three live views and the
// refresh scheduler into one cheaply cloneable handle. Every trigger
// funnels through `DashboardState::dispatch`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::metrics::MetricsClient;
use crate::model::DeviceId;
use crate::scheduler::{Dispatch, RefreshScheduler, Trigger};
use crate::selection::{DeviceSelection, SelectorValues};
use crate::view::{
    HistoryFrame, HistoryView, LiveView, ProportionFrame, ProportionView, RefreshOutcome, Surface,
    TrendFrame, TrendView, ViewKind,
};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardState>`. Construct, call
/// [`start()`](Self::start), and tear down with
/// [`shutdown()`](Self::shutdown).
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<DashboardState>,
}

struct DashboardState {
    config: DashboardConfig,
    selection: DeviceSelection,
    client: MetricsClient,
    trend: Arc<LiveView<TrendView>>,
    proportion: Arc<LiveView<ProportionView>>,
    history: Arc<LiveView<HistoryView>>,
    scheduler: RefreshScheduler,
    cancel: CancellationToken,
}

impl DashboardController {
    /// Create a controller for the configured backend. Does NOT start
    /// polling; call [`start()`](Self::start).
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = MetricsClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a controller around an existing metrics client.
    pub fn with_client(config: DashboardConfig, client: MetricsClient) -> Self {
        let cancel = CancellationToken::new();
        let selection = DeviceSelection::new(SelectorValues::new(
            config.switch_id.as_deref().unwrap_or_default(),
            config.port_id.as_deref().unwrap_or_default(),
        ));

        let trend = Arc::new(LiveView::new(
            client.clone(),
            selection.subscribe(),
            cancel.clone(),
        ));
        let proportion = Arc::new(LiveView::new(
            client.clone(),
            selection.subscribe(),
            cancel.clone(),
        ));
        let history = Arc::new(LiveView::new(
            client.clone(),
            selection.subscribe(),
            cancel.clone(),
        ));
        let scheduler = RefreshScheduler::new(config.poll_interval, cancel.child_token());

        Self {
            inner: Arc::new(DashboardState {
                config,
                selection,
                client,
                trend,
                proportion,
                history,
                scheduler,
                cancel,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the refresh timer and selection watcher.
    ///
    /// The first timer tick fires immediately. Calling `start` twice is
    /// harmless; calling it after [`shutdown()`](Self::shutdown) fails.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.ensure_running()?;
        self.inner
            .scheduler
            .start(Arc::downgrade(&self.inner), self.inner.selection.subscribe())
            .await?;
        info!(
            url = %self.inner.config.base_url,
            interval_ms = self.inner.config.poll_interval.as_millis(),
            "dashboard started"
        );
        Ok(())
    }

    /// Stop the timer, cancel in-flight refreshes, and wait for the
    /// scheduler to exit. No fetch is issued afterwards.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.scheduler.stop().await;
        self.inner.trend.cancel_in_flight().await;
        self.inner.proportion.cancel_in_flight().await;
        self.inner.history.cancel_in_flight().await;
        info!("dashboard shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.is_shut_down() {
            Err(CoreError::ShutDown)
        } else {
            Ok(())
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selection(&self) -> &DeviceSelection {
        &self.inner.selection
    }

    pub fn current_device_id(&self) -> Result<DeviceId, CoreError> {
        self.inner.selection.current_device_id()
    }

    // ── Triggers ─────────────────────────────────────────────────────

    /// Pointer hovered over `kind`'s panel.
    pub fn hover(&self, kind: ViewKind) -> Result<(), CoreError> {
        self.inner.scheduler.trigger(Trigger::Hover(kind))
    }

    /// Operator asked for a refresh.
    pub fn request_refresh(&self) -> Result<(), CoreError> {
        self.inner.scheduler.trigger(Trigger::Manual)
    }

    /// Refresh one view now and wait for the result.
    pub async fn refresh(&self, kind: ViewKind) -> Result<RefreshOutcome, CoreError> {
        self.ensure_running()?;
        let Ok(device) = self.current_device_id() else {
            return Ok(RefreshOutcome::Skipped);
        };
        let state = &self.inner;
        Ok(match kind {
            ViewKind::Trend => state.trend.refresh(device).await,
            ViewKind::Proportion => state.proportion.refresh(device).await,
            ViewKind::History => state.history.refresh(device).await,
        })
    }

    /// Refresh all three views now and wait for every result.
    pub async fn refresh_all(&self) -> Result<[RefreshOutcome; 3], CoreError> {
        self.ensure_running()?;
        let Ok(device) = self.current_device_id() else {
            return Ok([
                RefreshOutcome::Skipped,
                RefreshOutcome::Skipped,
                RefreshOutcome::Skipped,
            ]);
        };
        let state = &self.inner;
        let (trend, proportion, history) = tokio::join!(
            state.trend.refresh(device.clone()),
            state.proportion.refresh(device.clone()),
            state.history.refresh(device),
        );
        Ok([trend, proportion, history])
    }

    // ── Surfaces ─────────────────────────────────────────────────────

    pub fn trend(&self) -> watch::Receiver<Surface<TrendFrame>> {
        self.inner.trend.subscribe()
    }

    pub fn proportion(&self) -> watch::Receiver<Surface<ProportionFrame>> {
        self.inner.proportion.subscribe()
    }

    pub fn history(&self) -> watch::Receiver<Surface<HistoryFrame>> {
        self.inner.history.subscribe()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Ports known for `switch_id`, sorted.
    pub async fn port_ids(&self, switch_id: &str) -> Result<Vec<String>, CoreError> {
        self.ensure_running()?;
        Ok(self.inner.client.fetch_port_ids(switch_id).await?)
    }
}

impl Dispatch for DashboardState {
    fn dispatch(&self, trigger: Trigger) {
        let device = match self.selection.current_device_id() {
            Ok(device) => device,
            Err(_) => {
                trace!(?trigger, "no device selected; skipping refresh");
                return;
            }
        };
        if self.cancel.is_cancelled() {
            return;
        }
        debug!(?trigger, %device, "refreshing all views");

        let trend = Arc::clone(&self.trend);
        let proportion = Arc::clone(&self.proportion);
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            tokio::join!(
                trend.refresh(device.clone()),
                proportion.refresh(device.clone()),
                history.refresh(device),
            );
        });
    }
}

impl Drop for DashboardState {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
