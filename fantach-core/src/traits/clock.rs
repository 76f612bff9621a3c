//! Timestamp source
//!
//! The clock is read from both execution contexts (edge capture and the
//! periodic estimator), so implementations must be safe to call from
//! interrupt context and must not block.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::time::Micros;

/// Monotonic microsecond clock that wraps at 2^32
pub trait MicrosClock {
    /// Current timestamp in µs
    fn now_us(&self) -> Micros;
}

impl<C: MicrosClock + ?Sized> MicrosClock for &C {
    fn now_us(&self) -> Micros {
        (**self).now_us()
    }
}

/// Manually driven clock for simulations and host tests
///
/// `advance` is a load followed by a store, so only one context may drive
/// the clock; any number of contexts may read it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU32,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub const fn new(start: Micros) -> Self {
        Self {
            now: AtomicU32::new(start),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, now: Micros) {
        self.now.store(now, Ordering::Release);
    }

    /// Move forward by `delta` µs, wrapping like a hardware counter
    pub fn advance(&self, delta: Micros) {
        let now = self.now.load(Ordering::Acquire);
        self.now.store(now.wrapping_add(delta), Ordering::Release);
    }
}

impl MicrosClock for ManualClock {
    fn now_us(&self) -> Micros {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::new(Micros::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_us(), 1);

        clock.set(500);
        assert_eq!((&clock).now_us(), 500);
    }
}
