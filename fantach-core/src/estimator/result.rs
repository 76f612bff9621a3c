//! Per-interval estimate handed to the reporting sink

use super::extrapolate::extrapolate;
use crate::capture::Snapshot;
use crate::config::TachConfig;
use crate::time::{Micros, MICROS_PER_MINUTE};

/// One completed interval
///
/// Durations are whole microseconds; `cycles` and `rpm` are floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalResult {
    /// Closed-interval counter, wraps
    pub sequence: u32,
    /// Interval start timestamp
    pub start: Micros,
    /// Interval end timestamp
    pub end: Micros,
    /// `end - start`, the window RPM is normalised by
    pub duration_us: Micros,
    /// Raw accepted tick count
    pub ticks: u32,
    /// Pre-partial period used by the estimate
    pub pre_tick_us: Micros,
    /// Post-partial period used by the estimate
    pub post_tick_us: Micros,
    /// Mean measured tick period
    pub avg_tick_period_us: Micros,
    /// Estimated revolutions in the interval
    pub cycles: f32,
    /// Revolutions per minute, normalised by the measured `duration_us`
    /// rather than the configured interval length
    pub rpm: f32,
    /// Edges rejected as contact bounce
    pub bounced: u32,
}

impl IntervalResult {
    /// Turn a closed interval's counters into an estimate
    pub fn from_snapshot(config: &TachConfig, snapshot: &Snapshot, sequence: u32) -> Self {
        let estimate = extrapolate(config, snapshot);
        let duration_us = snapshot.duration_us();

        let cycles = estimate.periods / config.ticks_per_revolution.max(1) as f32;
        let rpm = if snapshot.ticks == 0 || duration_us == 0 {
            0.0
        } else {
            cycles * MICROS_PER_MINUTE / duration_us as f32
        };

        Self {
            sequence,
            start: snapshot.start,
            end: snapshot.end,
            duration_us,
            ticks: snapshot.ticks,
            pre_tick_us: estimate.pre_tick_us as Micros,
            post_tick_us: estimate.post_tick_us as Micros,
            avg_tick_period_us: estimate.avg_tick_period_us as Micros,
            cycles,
            rpm,
            bounced: snapshot.bounced,
        }
    }

    /// No revolutions measured in this interval
    pub fn is_stopped(&self) -> bool {
        self.rpm == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimationMode;

    #[test]
    fn test_reference_interval() {
        // 1s interval, 2 ticks/rev, tick every 15ms starting at 5ms:
        // 67 ticks, 4000 ticks/min -> 2000 RPM
        let config = TachConfig::default();
        let snapshot = Snapshot {
            start: 0,
            end: 1_000_000,
            ticks: 67,
            pre_tick_us: 5_000,
            post_tick_us: 5_000,
            bounced: 0,
        };

        let result = IntervalResult::from_snapshot(&config, &snapshot, 7);
        assert_eq!(result.sequence, 7);
        assert_eq!(result.ticks, 67);
        assert_eq!(result.duration_us, 1_000_000);
        assert_eq!(result.avg_tick_period_us, 15_000);
        assert!((result.cycles - 33.333).abs() < 0.01);
        assert!((result.rpm - 2_000.0).abs() < 0.5);
        assert!(!result.is_stopped());
    }

    #[test]
    fn test_counting_mode_overestimates() {
        let config = TachConfig {
            mode: EstimationMode::Counting,
            ..TachConfig::default()
        };
        let snapshot = Snapshot {
            start: 0,
            end: 1_000_000,
            ticks: 67,
            pre_tick_us: 5_000,
            post_tick_us: 5_000,
            bounced: 0,
        };

        let result = IntervalResult::from_snapshot(&config, &snapshot, 0);
        assert_eq!(result.cycles, 33.5);
        assert!((result.rpm - 2_010.0).abs() < 0.5);
    }

    #[test]
    fn test_rpm_uses_measured_window() {
        // Closed 500ms late: same cycles, spread over the longer window
        let config = TachConfig::default();
        let snapshot = Snapshot {
            start: 0,
            end: 1_500_000,
            ticks: 67,
            pre_tick_us: 5_000,
            post_tick_us: 505_000,
            bounced: 0,
        };

        let result = IntervalResult::from_snapshot(&config, &snapshot, 0);
        assert_eq!(result.duration_us, 1_500_000);
        let expected = result.cycles * 60_000_000.0 / 1_500_000.0;
        assert!((result.rpm - expected).abs() < 1e-3);
        assert!(result.rpm < 2_000.0);
    }

    #[test]
    fn test_no_ticks_is_exact_zero() {
        let config = TachConfig::default();
        let snapshot = Snapshot {
            start: 0,
            end: 1_000_000,
            ticks: 0,
            pre_tick_us: 0,
            post_tick_us: 4_000_000,
            bounced: 3,
        };

        let result = IntervalResult::from_snapshot(&config, &snapshot, 0);
        assert_eq!(result.rpm, 0.0);
        assert_eq!(result.cycles, 0.0);
        assert_eq!(result.pre_tick_us, 0);
        assert_eq!(result.post_tick_us, 0);
        assert_eq!(result.bounced, 3);
        assert!(result.is_stopped());
    }
}
