//! Tachometer edge capture task
//!
//! Runs on the high-priority interrupt executor, so it preempts the
//! estimator and reporter. Each wake-up is one edge notification from the
//! GPIO interrupt; the timestamp is read inside the accumulator's critical
//! section. No logging, no allocation, no waiting on anything but the pin.
//!
//! While the estimator holds the critical section, the GPIO interrupt stays
//! pending and fires as soon as the section ends: the edge is delivered late
//! but never lost, and lands in the freshly opened interval.

use embassy_rp::gpio::Input;

use fantach_core::{EdgePolarity, Micros};

use crate::channels::SHARED_TACH;
use crate::clock::EmbassyClock;

/// Tachometer capture task
#[embassy_executor::task]
pub async fn capture_task(mut tach: Input<'static>, edge: EdgePolarity, bounce_period_us: Micros) {
    let clock = EmbassyClock;

    loop {
        match edge {
            EdgePolarity::Rising => tach.wait_for_rising_edge().await,
            EdgePolarity::Falling => tach.wait_for_falling_edge().await,
            EdgePolarity::Both => tach.wait_for_any_edge().await,
        }

        SHARED_TACH.record_edge(&clock, bounce_period_us);
    }
}
