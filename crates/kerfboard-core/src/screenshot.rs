//! Screenshot rendezvous between a blocked command and the browser.
//!
//! The slot moves Idle → Requested → Fulfilled (or back to Idle on
//! timeout). A `take_screenshot` command parks on the condvar with a
//! bounded deadline while the browser, on its next poll, sees the
//! requested flag and pushes captured data through the bridge. The slot
//! has its own lock so the wait never blocks document traffic.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Slot {
    requested: bool,
    data: Option<String>,
}

/// Single-slot rendezvous for the out-of-band screenshot artifact.
#[derive(Debug, Default)]
pub struct ScreenshotSlot {
    inner: Mutex<Slot>,
    ready: Condvar,
}

impl ScreenshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a request is currently outstanding. Exposed to pollers.
    pub fn is_requested(&self) -> bool {
        self.lock().requested
    }

    /// Request a capture and wait up to `deadline` for it to arrive.
    ///
    /// Any stale payload from an earlier request is discarded first. The
    /// payload is single-use: a successful wait consumes it. On timeout the
    /// requested flag is cleared and `None` returned; a capture landing
    /// after that is stored but stays unconsumed until the next request
    /// clears it, which is acceptable for a single-slot channel.
    pub fn request(&self, deadline: Duration) -> Option<String> {
        let mut slot = self.lock();
        slot.data = None;
        slot.requested = true;

        let expires = Instant::now() + deadline;
        loop {
            if let Some(data) = slot.data.take() {
                return Some(data);
            }
            let now = Instant::now();
            if now >= expires {
                slot.requested = false;
                return None;
            }
            slot = self
                .ready
                .wait_timeout(slot, expires - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Store captured data and wake the waiting request, if any.
    pub fn fulfill(&self, data: String) {
        let mut slot = self.lock();
        slot.data = Some(data);
        slot.requested = false;
        drop(slot);
        self.ready.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fulfilled_request_consumes_payload() {
        let slot = Arc::new(ScreenshotSlot::new());

        let pusher = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                while !slot.is_requested() {
                    thread::sleep(Duration::from_millis(5));
                }
                slot.fulfill("iVBORw0KGgo=".to_string());
            })
        };

        let data = slot.request(Duration::from_secs(2));
        pusher.join().unwrap();

        assert_eq!(data.as_deref(), Some("iVBORw0KGgo="));
        assert!(!slot.is_requested());
        // Single-use: nothing left for a second request.
        assert_eq!(slot.request(Duration::from_millis(20)), None);
    }

    #[test]
    fn test_timeout_resets_requested_flag() {
        let slot = ScreenshotSlot::new();
        let started = Instant::now();

        assert_eq!(slot.request(Duration::from_millis(50)), None);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!slot.is_requested());
    }

    #[test]
    fn test_new_request_discards_stale_payload() {
        let slot = ScreenshotSlot::new();

        // A capture that arrived after a timeout sits unconsumed.
        slot.fulfill("stale".to_string());
        assert!(!slot.is_requested());

        // The next request clears it rather than returning it.
        assert_eq!(slot.request(Duration::from_millis(20)), None);
    }

    #[test]
    fn test_late_fulfill_is_stored_but_not_consumed() {
        let slot = ScreenshotSlot::new();
        assert_eq!(slot.request(Duration::from_millis(10)), None);

        slot.fulfill("late".to_string());
        assert!(!slot.is_requested());
        assert_eq!(slot.lock().data.as_deref(), Some("late"));
    }
}
