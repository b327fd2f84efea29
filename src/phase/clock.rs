//! Monotonic time sources for the session engine.
//!
//! All engine arithmetic is in milliseconds since an arbitrary origin.
//! Only differences between readings are meaningful.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;

/// Milliseconds on a monotonic time line.
pub type Millis = u64;

/// A source of monotonic "now".
///
/// Readings must never decrease. Wall-clock adjustments must not affect
/// them.
pub trait Clock {
    /// Current time in milliseconds since this clock's origin.
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Real elapsed time, anchored at construction.
///
/// Backed by `tokio::time::Instant`, so a paused tokio runtime
/// (`tokio::time::pause`) also pauses this clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Millis {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }
}

/// Hand-driven clock for deterministic tests and simulations.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start` milliseconds.
    #[must_use]
    pub fn starting_at(start: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Moves the clock to `ms`. Earlier values are ignored.
    pub fn set(&self, ms: Millis) {
        self.now.fetch_max(ms, Ordering::SeqCst);
    }

    /// Moves the clock forward by `ms`.
    pub fn advance(&self, ms: Millis) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}
