//! Wraparound-safe microsecond arithmetic
//!
//! All timestamps are `u32` microsecond counters that wrap at 2^32
//! (about 71.6 minutes). Durations are always computed with wrapping
//! subtraction, and absolute timestamps are never compared with `<`/`>`:
//! only the elapsed time between two of them is meaningful.
//!
//! The wraparound window bounds the system: an interval, or the gap between
//! two ticks that both fall inside one interval, must be shorter than
//! [`WRAP_WINDOW_US`] or the elapsed value silently aliases.

/// Absolute timestamp or duration in microseconds
pub type Micros = u32;

/// Longest duration representable before the clock wraps
pub const WRAP_WINDOW_US: Micros = Micros::MAX;

/// Longest interval accepted by configuration validation
///
/// Half the wraparound window, so that an interval closed late by the
/// consumer still measures correctly.
pub const MAX_INTERVAL_US: Micros = WRAP_WINDOW_US / 2;

/// Microseconds per minute, used to scale cycles per interval to RPM
pub const MICROS_PER_MINUTE: f32 = 60.0 * 1_000_000.0;

/// Time elapsed from `then` to `now`, correct across one clock wrap
#[inline(always)]
pub const fn elapsed_since(now: Micros, then: Micros) -> Micros {
    now.wrapping_sub(then)
}

/// Check whether at least `duration` has passed from `then` to `now`
#[inline]
pub const fn has_elapsed(now: Micros, then: Micros, duration: Micros) -> bool {
    elapsed_since(now, then) >= duration
}
