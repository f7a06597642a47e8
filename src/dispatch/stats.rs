//! Dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for request dispatch
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Total requests received
    pub requests_received: AtomicU64,
    /// Requests that completed with status 200
    pub requests_succeeded: AtomicU64,
    /// Requests that completed with status 400 or 500
    pub requests_failed: AtomicU64,
    /// Requests whose handler was still running when the deadline fired
    pub deadlines_exceeded: AtomicU64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_succeeded(&self) {
        self.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn deadline_exceeded(&self) {
        self.deadlines_exceeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Requests received but not yet completed.
    pub fn in_flight(&self) -> u64 {
        let received = self.requests_received.load(Ordering::Relaxed);
        let done = self.requests_succeeded.load(Ordering::Relaxed)
            + self.requests_failed.load(Ordering::Relaxed);
        received.saturating_sub(done)
    }
}
