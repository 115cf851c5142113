//! Viewport height tracking.

use super::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Sidebar, padding and header around the content on desktop.
const DESKTOP_CHROME: u32 = 348;
/// Mobile header and padding.
const MOBILE_CHROME: u32 = 100;

/// A viewport height and the content height it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportHeight {
    pub height: u32,
}

impl ViewportHeight {
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    pub fn available_height(&self) -> u32 {
        self.height.saturating_sub(DESKTOP_CHROME)
    }

    pub fn available_height_mobile(&self) -> u32 {
        self.height.saturating_sub(MOBILE_CHROME)
    }
}

/// Follows the viewport height.
///
/// Resizes are debounced; orientation changes apply at once since they
/// arrive as a single event.
pub struct ViewportTracker {
    debouncer: Debouncer<u32>,
}

impl ViewportTracker {
    pub fn new(initial_height: u32) -> Self {
        Self::with_debounce(initial_height, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(initial_height: u32, delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(initial_height, delay),
        }
    }

    pub fn resize(&mut self, height: u32) {
        debug!(height, "viewport resize");
        self.debouncer.schedule(height);
    }

    pub fn orientation_change(&mut self, height: u32) {
        debug!(height, "viewport orientation change");
        self.debouncer.flush_now(height);
    }

    pub fn current(&self) -> ViewportHeight {
        ViewportHeight::new(self.debouncer.current())
    }

    /// Receiver that observes every settled height.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.debouncer.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn available_heights_saturate() {
        let v = ViewportHeight::new(900);
        assert_eq!(v.available_height(), 552);
        assert_eq!(v.available_height_mobile(), 800);

        let v = ViewportHeight::new(50);
        assert_eq!(v.available_height(), 0);
        assert_eq!(v.available_height_mobile(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn resize_settles_after_quiet_period() {
        let mut tracker = ViewportTracker::new(800);
        tracker.resize(700);
        tracker.resize(600);
        assert_eq!(tracker.current().height, 800);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(tracker.current().height, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn orientation_change_is_immediate() {
        let mut tracker = ViewportTracker::new(800);
        let rx = tracker.subscribe();
        tracker.resize(500);
        tracker.orientation_change(1024);
        assert_eq!(*rx.borrow(), 1024);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(tracker.current().height, 1024);
    }
}
