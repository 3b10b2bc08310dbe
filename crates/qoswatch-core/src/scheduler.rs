// ── Refresh scheduler ──
//
// One background task multiplexes the three trigger sources (timer,
// selector change, hover/manual requests) into a single dispatch call.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::selection::SelectorValues;
use crate::view::ViewKind;

const TRIGGER_CHANNEL_SIZE: usize = 16;

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    SelectionChanged,
    Hover(ViewKind),
    Manual,
}

/// Receives every trigger the scheduler observes.
pub trait Dispatch: Send + Sync + 'static {
    fn dispatch(&self, trigger: Trigger);
}

/// Owns the recurring timer and the trigger channel.
pub struct RefreshScheduler {
    period: Duration,
    trigger_tx: mpsc::Sender<Trigger>,
    trigger_rx: Mutex<Option<mpsc::Receiver<Trigger>>>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// `cancel` stops the scheduler task; it is typically a child of the
    /// dashboard's shutdown token.
    pub fn new(period: Duration, cancel: CancellationToken) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_CHANNEL_SIZE);
        Self {
            period,
            trigger_tx,
            trigger_rx: Mutex::new(Some(trigger_rx)),
            cancel,
            handle: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the scheduler task. A second call is a no-op.
    ///
    /// The task holds `target` weakly and stops once it is gone.
    pub async fn start<D: Dispatch>(
        &self,
        target: Weak<D>,
        selection: watch::Receiver<SelectorValues>,
    ) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }
        let Some(trigger_rx) = self.trigger_rx.lock().await.take() else {
            return Ok(());
        };

        let handle = tokio::spawn(scheduler_task(
            target,
            self.period,
            selection,
            trigger_rx,
            self.cancel.clone(),
        ));
        *self.handle.lock().await = Some(handle);
        debug!(period_ms = self.period.as_millis(), "refresh scheduler started");
        Ok(())
    }

    /// Queue a trigger for dispatch.
    ///
    /// Hover bursts beyond the channel capacity are dropped; the refreshes
    /// they would cause are already queued.
    pub fn trigger(&self, trigger: Trigger) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }
        match self.trigger_tx.try_send(trigger) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!(?trigger, "trigger channel full; coalescing");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(CoreError::ShutDown),
        }
    }

    /// Cancel the timer and wait for the task to exit.
    pub async fn stop(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.lock().await.take() {
            let _ = handle.await;
        }
        debug!("refresh scheduler stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

async fn scheduler_task<D: Dispatch>(
    target: Weak<D>,
    period: Duration,
    mut selection: watch::Receiver<SelectorValues>,
    mut trigger_rx: mpsc::Receiver<Trigger>,
    cancel: CancellationToken,
) {
    // First tick completes immediately: that is the initial paint.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut selection_open = true;

    loop {
        let trigger = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = selection.changed(), if selection_open => {
                if changed.is_err() {
                    selection_open = false;
                    continue;
                }
                Trigger::SelectionChanged
            }
            Some(trigger) = trigger_rx.recv() => trigger,
            _ = interval.tick() => Trigger::Tick,
        };

        let Some(target) = target.upgrade() else {
            break;
        };
        trace!(?trigger, "dispatching");
        target.dispatch(trigger);
    }
}
