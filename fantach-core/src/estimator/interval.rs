//! Interval estimator
//!
//! The periodic consumer. Interval boundaries are back-to-back: each
//! interval starts exactly where the previous one was closed, so loop
//! overhead shows up as a slightly longer measured window rather than as
//! lost or double-counted ticks.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::result::IntervalResult;
use crate::capture::{SharedAccumulator, Snapshot};
use crate::config::TachConfig;
use crate::time::{elapsed_since, has_elapsed, Micros};
use crate::traits::{MicrosClock, ReportSink};

/// Periodic consumer of the shared accumulator
#[derive(Debug, Clone)]
pub struct IntervalEstimator {
    config: TachConfig,
    /// Start of the open interval (previous close)
    start: Micros,
    /// Sequence number of the next result
    sequence: u32,
}

impl IntervalEstimator {
    /// Create an estimator whose first interval started at `start`
    ///
    /// `start` should come from [`SharedAccumulator::open`] so both sides
    /// agree on the boundary.
    pub fn new(config: TachConfig, start: Micros) -> Self {
        Self {
            config,
            start,
            sequence: 0,
        }
    }

    /// Start of the open interval
    pub fn start(&self) -> Micros {
        self.start
    }

    /// Check whether the open interval has run its full length
    pub fn is_due(&self, now: Micros) -> bool {
        has_elapsed(now, self.start, self.config.interval_us)
    }

    /// Time left until the open interval is due (0 if already due)
    pub fn remaining_us(&self, now: Micros) -> Micros {
        self.config
            .interval_us
            .saturating_sub(elapsed_since(now, self.start))
    }

    /// Close the open interval now, whether or not it is due
    pub fn close<M: RawMutex, C: MicrosClock>(
        &mut self,
        shared: &SharedAccumulator<M>,
        clock: &C,
    ) -> IntervalResult {
        let snapshot = shared.take_snapshot(clock);
        self.finish(&snapshot)
    }

    /// Turn an already-taken snapshot into the next result
    pub fn finish(&mut self, snapshot: &Snapshot) -> IntervalResult {
        let result = IntervalResult::from_snapshot(&self.config, snapshot, self.sequence);
        self.start = snapshot.end;
        self.sequence = self.sequence.wrapping_add(1);
        result
    }

    /// Close the open interval if it is due
    pub fn poll<M: RawMutex, C: MicrosClock>(
        &mut self,
        shared: &SharedAccumulator<M>,
        clock: &C,
    ) -> Option<IntervalResult> {
        if self.is_due(clock.now_us()) {
            Some(self.close(shared, clock))
        } else {
            None
        }
    }

    /// Busy-wait until the open interval is due, then close it
    ///
    /// Spins on the clock; callers that can sleep should wait out
    /// [`remaining_us`](Self::remaining_us) first.
    pub fn wait_and_close<M: RawMutex, C: MicrosClock>(
        &mut self,
        shared: &SharedAccumulator<M>,
        clock: &C,
    ) -> IntervalResult {
        loop {
            if let Some(result) = self.poll(shared, clock) {
                return result;
            }
            core::hint::spin_loop();
        }
    }

    /// One full cycle: wait, close, report
    pub fn run_once<M: RawMutex, C: MicrosClock, S: ReportSink>(
        &mut self,
        shared: &SharedAccumulator<M>,
        clock: &C,
        sink: &mut S,
    ) -> IntervalResult {
        let result = self.wait_and_close(shared, clock);
        sink.report(&result);
        result
    }
}
