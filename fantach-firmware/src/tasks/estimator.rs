//! Interval estimator task
//!
//! Closes one interval per configured period. Most of the period is spent
//! asleep on an embassy timer; the last stretch is a busy-wait on the clock
//! so the close lands on the boundary instead of on the next timer tick.

use defmt::*;
use embassy_time::Timer;

use fantach_core::{IntervalEstimator, Micros, MicrosClock, TachConfig};

use super::report::ChannelSink;
use crate::channels::SHARED_TACH;
use crate::clock::EmbassyClock;

/// Busy-wait window before each interval boundary (µs)
const SPIN_MARGIN_US: Micros = 200;

/// Estimator task
#[embassy_executor::task]
pub async fn estimator_task(config: TachConfig) {
    info!(
        "Estimator task started: interval={}us, {} ticks/rev, mode={:?}",
        config.interval_us, config.ticks_per_revolution, config.mode
    );

    let clock = EmbassyClock;
    let start = SHARED_TACH.open(&clock);
    let mut estimator = IntervalEstimator::new(config, start);
    let mut sink = ChannelSink;

    loop {
        let remaining = estimator.remaining_us(clock.now_us());
        if remaining > SPIN_MARGIN_US {
            Timer::after_micros((remaining - SPIN_MARGIN_US) as u64).await;
        }

        let result = estimator.run_once(&SHARED_TACH, &clock, &mut sink);
        trace!("Interval {} closed at {}", result.sequence, result.end);
    }
}
