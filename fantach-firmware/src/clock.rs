//! Embassy-backed timestamp source

use embassy_time::Instant;

use fantach_core::{Micros, MicrosClock};

/// Microsecond clock from the RP2040 timer via embassy-time
///
/// The 64-bit uptime is truncated to `u32`, which wraps exactly like a
/// hardware microsecond counter (about every 71.6 minutes). Reading it is
/// lock-free and safe from any executor or interrupt.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MicrosClock for EmbassyClock {
    #[inline]
    fn now_us(&self) -> Micros {
        Instant::now().as_micros() as Micros
    }
}
