//! Status LED task
//!
//! Slow blink while the fan is stopped, fast blink while it spins.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;
use portable_atomic::Ordering;

use crate::channels::FAN_SPINNING;

/// Half-period while the fan spins
const FAST_BLINK_MS: u64 = 100;

/// Half-period while the fan is stopped
const SLOW_BLINK_MS: u64 = 1000;

/// Status LED task
#[embassy_executor::task]
pub async fn status_led_task(mut led: Output<'static>) {
    info!("Status LED task started");

    loop {
        led.toggle();

        let half_period = if FAN_SPINNING.load(Ordering::Relaxed) {
            FAST_BLINK_MS
        } else {
            SLOW_BLINK_MS
        };
        Timer::after_millis(half_period).await;
    }
}
