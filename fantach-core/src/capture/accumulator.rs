//! Interval accumulator
//!
//! Running counters for the interval that is currently open. Edges are
//! only ever aggregated, never stored individually.
//!
//! Two lifecycles live side by side here:
//!
//! - Per-interval counters (`tick_count`, `first_tick_offset`, `bounced`)
//!   are cleared every time the consumer takes a [`Snapshot`].
//! - Edge history (`last_tick`, `last_accepted`) survives the reset. The
//!   next interval needs the true most recent edge to compute its
//!   post-partial period, and the debounce filter must not forget an edge
//!   just because an interval boundary fell right after it.

use crate::time::{elapsed_since, Micros};

/// Result of offering one edge to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Counted as a tick
    Accepted,
    /// Rejected as contact bounce
    Bounced,
}

/// Counters of one closed interval, taken atomically by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Interval start (previous close)
    pub start: Micros,
    /// Interval end (this close)
    pub end: Micros,
    /// Ticks accepted in the interval
    pub ticks: u32,
    /// From `start` to the first accepted tick (0 if no ticks)
    pub pre_tick_us: Micros,
    /// From the most recent tick to `end`
    ///
    /// Only meaningful when `ticks > 0`; with no ticks the last edge may
    /// predate the wraparound window.
    pub post_tick_us: Micros,
    /// Edges rejected by the debounce filter in the interval
    pub bounced: u32,
}

impl Snapshot {
    /// Wall time covered by the interval
    pub fn duration_us(&self) -> Micros {
        elapsed_since(self.end, self.start)
    }
}

/// Tick counters for the open interval
#[derive(Debug, Clone)]
pub struct IntervalAccumulator {
    /// Close time of the previous interval
    opened_at: Micros,
    /// Accepted edges since `opened_at`
    tick_count: u32,
    /// `opened_at` to the first accepted edge
    first_tick_offset: Micros,
    /// Most recent accepted edge, kept across resets
    last_tick: Micros,
    /// Debounce reference, kept across resets
    last_accepted: Option<Micros>,
    /// Bounced edges since `opened_at`
    bounced: u32,
}

impl Default for IntervalAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalAccumulator {
    /// Create an accumulator with an interval opened at timestamp 0
    pub const fn new() -> Self {
        Self {
            opened_at: 0,
            tick_count: 0,
            first_tick_offset: 0,
            last_tick: 0,
            last_accepted: None,
            bounced: 0,
        }
    }

    /// Offer one edge seen at `now`
    ///
    /// Bounded and allocation-free: safe to call from interrupt context.
    /// `now` must not predate the last [`reopen`](Self::reopen).
    pub fn record_edge(&mut self, now: Micros, bounce_period: Micros) -> EdgeOutcome {
        if let Some(prev) = self.last_accepted {
            if elapsed_since(now, prev) < bounce_period {
                self.bounced = self.bounced.saturating_add(1);
                return EdgeOutcome::Bounced;
            }
        }

        if self.tick_count == 0 {
            self.first_tick_offset = elapsed_since(now, self.opened_at);
        }

        debug_assert!(self.tick_count < u32::MAX, "tick counter saturated");
        self.tick_count = self.tick_count.saturating_add(1);
        self.last_accepted = Some(now);
        self.last_tick = now;

        EdgeOutcome::Accepted
    }

    /// Close the open interval at `end` and start the next one there
    pub fn take(&mut self, end: Micros) -> Snapshot {
        let snapshot = Snapshot {
            start: self.opened_at,
            end,
            ticks: self.tick_count,
            pre_tick_us: self.first_tick_offset,
            post_tick_us: elapsed_since(end, self.last_tick),
            bounced: self.bounced,
        };
        self.reopen(end);
        snapshot
    }

    /// Discard the per-interval counters and open a new interval at `at`
    ///
    /// Edge history is kept.
    pub fn reopen(&mut self, at: Micros) {
        self.opened_at = at;
        self.tick_count = 0;
        self.first_tick_offset = 0;
        self.bounced = 0;
    }

    /// Start of the open interval
    pub fn opened_at(&self) -> Micros {
        self.opened_at
    }

    /// Ticks accepted so far in the open interval
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Timestamp of the most recent accepted edge
    pub fn last_tick(&self) -> Micros {
        self.last_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNCE: Micros = 1_000;

    #[test]
    fn test_first_edge_sets_offset() {
        let mut acc = IntervalAccumulator::new();
        acc.reopen(10_000);

        assert_eq!(acc.record_edge(12_500, BOUNCE), EdgeOutcome::Accepted);
        assert_eq!(acc.record_edge(20_000, BOUNCE), EdgeOutcome::Accepted);

        let snap = acc.take(30_000);
        assert_eq!(snap.start, 10_000);
        assert_eq!(snap.end, 30_000);
        assert_eq!(snap.ticks, 2);
        assert_eq!(snap.pre_tick_us, 2_500);
        assert_eq!(snap.post_tick_us, 10_000);
        assert_eq!(snap.duration_us(), 20_000);
    }

    #[test]
    fn test_take_resets_counters_only() {
        let mut acc = IntervalAccumulator::new();
        acc.record_edge(100, BOUNCE);
        acc.record_edge(5_000, BOUNCE);
        acc.take(6_000);

        assert_eq!(acc.tick_count(), 0);
        assert_eq!(acc.opened_at(), 6_000);
        assert_eq!(acc.last_tick(), 5_000);

        // No ticks in the next interval: post partial still measures from
        // the true last edge
        let snap = acc.take(9_000);
        assert_eq!(snap.ticks, 0);
        assert_eq!(snap.pre_tick_us, 0);
        assert_eq!(snap.post_tick_us, 4_000);
    }

    #[test]
    fn test_debounce_spans_interval_boundary() {
        let mut acc = IntervalAccumulator::new();
        acc.record_edge(9_900, BOUNCE);
        acc.take(10_000);

        // Bounce of the edge at 9_900, arriving just after the close
        assert_eq!(acc.record_edge(10_200, BOUNCE), EdgeOutcome::Bounced);
        let snap = acc.take(20_000);
        assert_eq!(snap.ticks, 0);
        assert_eq!(snap.bounced, 1);
    }

    #[test]
    fn test_bounced_edges_do_not_move_reference() {
        let mut acc = IntervalAccumulator::new();
        acc.record_edge(1_000, BOUNCE);
        assert_eq!(acc.record_edge(1_600, BOUNCE), EdgeOutcome::Bounced);
        // 1_000 after the accepted edge, only 400 after the bounced one
        assert_eq!(acc.record_edge(2_000, BOUNCE), EdgeOutcome::Accepted);
    }

    #[test]
    fn test_very_first_edge_always_accepted() {
        let mut acc = IntervalAccumulator::new();
        assert_eq!(acc.record_edge(3, BOUNCE), EdgeOutcome::Accepted);
    }

    #[test]
    fn test_counts_across_clock_wrap() {
        let mut acc = IntervalAccumulator::new();
        let start = Micros::MAX - 4_999;
        acc.reopen(start);
        acc.record_edge(Micros::MAX - 1_999, BOUNCE);
        acc.record_edge(3_000, BOUNCE);

        let snap = acc.take(8_000);
        assert_eq!(snap.ticks, 2);
        assert_eq!(snap.pre_tick_us, 3_000);
        assert_eq!(snap.post_tick_us, 5_000);
        assert_eq!(snap.duration_us(), 13_000);
    }

    proptest! {
        #[test]
        fn prop_debounce_threshold(bounce in 1u32..50_000, first in any::<u32>(), gap in 0u32..100_000) {
            let mut acc = IntervalAccumulator::new();
            acc.reopen(first);
            acc.record_edge(first, bounce);
            let outcome = acc.record_edge(first.wrapping_add(gap), bounce);

            if gap < bounce {
                prop_assert_eq!(outcome, EdgeOutcome::Bounced);
                prop_assert_eq!(acc.tick_count(), 1);
            } else {
                prop_assert_eq!(outcome, EdgeOutcome::Accepted);
                prop_assert_eq!(acc.tick_count(), 2);
            }
        }

        #[test]
        fn prop_reset_restarts_offset(
            base in any::<u32>(),
            before in 1u32..10_000,
            close_after in 0u32..10_000,
            after in 0u32..1_000_000,
        ) {
            let mut acc = IntervalAccumulator::new();
            acc.reopen(base);
            acc.record_edge(base.wrapping_add(before), 0);
            let close = base.wrapping_add(before).wrapping_add(close_after);
            acc.take(close);

            acc.record_edge(close.wrapping_add(after), 0);
            let snap = acc.take(close.wrapping_add(after).wrapping_add(1));
            prop_assert_eq!(snap.ticks, 1);
            prop_assert_eq!(snap.pre_tick_us, after);
            prop_assert_eq!(snap.start, close);
        }
    }
}
