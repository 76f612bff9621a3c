//! Guarded accumulator shared between the edge context and the periodic
//! context
//!
//! The accumulator lives behind an embassy-sync blocking mutex. With
//! `CriticalSectionRawMutex` on a single-core target, holding the lock
//! masks interrupts, so an edge that arrives while the consumer is taking
//! its snapshot stays pending in the interrupt controller and is delivered
//! once the critical section ends. It is never dropped; its timestamp is
//! read after the reopen and therefore lands in the new interval.
//!
//! Both operations read the clock *inside* the critical section. Reading
//! it before taking the lock would let an edge slip in between, leaving a
//! tick timestamp later than the close time it is measured against.
//!
//! Only two operations are exposed: the producer records an edge, the
//! consumer takes-and-resets. There is no way to peek at the counters
//! without closing the interval.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::accumulator::{EdgeOutcome, IntervalAccumulator, Snapshot};
use crate::time::Micros;
use crate::traits::MicrosClock;

/// Interval accumulator behind a blocking mutex
///
/// Typically a `static` with `M = CriticalSectionRawMutex`.
pub struct SharedAccumulator<M: RawMutex> {
    inner: Mutex<M, RefCell<IntervalAccumulator>>,
}

impl<M: RawMutex> Default for SharedAccumulator<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SharedAccumulator<M> {
    /// Create an empty accumulator (usable in a `static`)
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(IntervalAccumulator::new())),
        }
    }

    /// Open the first interval at the current time and return its start
    ///
    /// Anything recorded before this call is discarded.
    pub fn open<C: MicrosClock>(&self, clock: &C) -> Micros {
        self.inner.lock(|acc| {
            let now = clock.now_us();
            acc.borrow_mut().reopen(now);
            now
        })
    }

    /// Producer: record an edge seen now
    pub fn record_edge<C: MicrosClock>(&self, clock: &C, bounce_period: Micros) -> EdgeOutcome {
        self.inner
            .lock(|acc| acc.borrow_mut().record_edge(clock.now_us(), bounce_period))
    }

    /// Consumer: close the open interval now and start the next one
    pub fn take_snapshot<C: MicrosClock>(&self, clock: &C) -> Snapshot {
        self.inner.lock(|acc| {
            let end = clock.now_us();
            acc.borrow_mut().take(end)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ManualClock;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_open_discards_early_edges() {
        let shared: SharedAccumulator<CriticalSectionRawMutex> = SharedAccumulator::new();
        let clock = ManualClock::new(100);

        shared.record_edge(&clock, 0);
        clock.set(1_000);
        assert_eq!(shared.open(&clock), 1_000);

        clock.set(2_000);
        let snap = shared.take_snapshot(&clock);
        assert_eq!(snap.start, 1_000);
        assert_eq!(snap.end, 2_000);
        assert_eq!(snap.ticks, 0);
    }

    #[test]
    fn test_record_and_take() {
        let shared: SharedAccumulator<CriticalSectionRawMutex> = SharedAccumulator::new();
        let clock = ManualClock::new(0);
        shared.open(&clock);

        clock.set(400);
        assert_eq!(shared.record_edge(&clock, 100), EdgeOutcome::Accepted);
        clock.set(450);
        assert_eq!(shared.record_edge(&clock, 100), EdgeOutcome::Bounced);
        clock.set(900);
        assert_eq!(shared.record_edge(&clock, 100), EdgeOutcome::Accepted);

        clock.set(1_000);
        let snap = shared.take_snapshot(&clock);
        assert_eq!(snap.ticks, 2);
        assert_eq!(snap.bounced, 1);
        assert_eq!(snap.pre_tick_us, 400);
        assert_eq!(snap.post_tick_us, 100);

        // Fresh interval starts exactly at the previous close
        clock.set(1_250);
        shared.record_edge(&clock, 100);
        clock.set(2_000);
        let snap = shared.take_snapshot(&clock);
        assert_eq!(snap.start, 1_000);
        assert_eq!(snap.ticks, 1);
        assert_eq!(snap.pre_tick_us, 250);
    }

    #[test]
    fn test_concurrent_producer_never_loses_ticks() {
        const EDGES: u32 = 20_000;

        let shared: Arc<SharedAccumulator<CriticalSectionRawMutex>> =
            Arc::new(SharedAccumulator::new());
        let clock = Arc::new(ManualClock::new(0));
        let done = Arc::new(AtomicBool::new(false));
        shared.open(&*clock);

        let producer = {
            let shared = Arc::clone(&shared);
            let clock = Arc::clone(&clock);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for _ in 0..EDGES {
                    clock.advance(10);
                    shared.record_edge(&*clock, 0);
                }
                done.store(true, Ordering::Release);
            })
        };

        let mut total = 0u32;
        let mut last_end = 0;
        loop {
            let finished = done.load(Ordering::Acquire);
            let snap = shared.take_snapshot(&*clock);

            assert_eq!(snap.start, last_end);
            if snap.ticks > 0 {
                // Every tick lies inside [start, end]
                assert!(snap.pre_tick_us <= snap.duration_us());
                assert!(snap.post_tick_us <= snap.duration_us());
            }
            total += snap.ticks;
            last_end = snap.end;

            if finished {
                break;
            }
            thread::yield_now();
        }

        producer.join().unwrap();
        assert_eq!(total, EDGES);
    }
}
