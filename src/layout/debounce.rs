//! Trailing-edge debounce as a single cancellable delayed task.
//!
//! Each [`Debouncer::schedule`] aborts the pending task and spawns a new one,
//! so only the last value of a burst is published, `delay` after the burst
//! ends. There is no recurring timer.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiet period for resize events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Publishes the last scheduled value once no new value arrived for `delay`.
///
/// Must be used from within a Tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    tx: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            delay,
            tx: Arc::new(tx),
            pending: None,
        }
    }

    /// Replace any pending value with `value` and restart the quiet period.
    pub fn schedule(&mut self, value: T) {
        if self.cancel() {
            trace!("debounce: pending value superseded");
        }
        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_replace(value);
        }));
    }

    /// Cancel any pending value and publish `value` immediately.
    pub fn flush_now(&mut self, value: T) {
        self.cancel();
        self.tx.send_replace(value);
    }

    /// Abort the pending task. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T: Clone> Debouncer<T> {
    /// Last published value.
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
