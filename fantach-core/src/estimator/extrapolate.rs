//! Fractional-cycle extrapolation
//!
//! Given only the tick count and the two boundary fragments of an interval,
//! estimate how many tick periods (including fractions) the interval
//! covered.
//!
//! ```text
//!  start                                                  end
//!    |<-pre->|<--- P --->|<--- P --->| ... |<--- P --->|<-post->|
//!            t0          t1          t2              t(n-1)
//! ```
//!
//! `n` ticks bound `n - 1` measured periods. Their average `P` is the best
//! local estimate of the true period, so each boundary fragment counts as
//! `fragment / P` of a period. A fragment longer than `P` means the fan
//! slowed or stopped near the boundary; it is clamped to one full period so
//! a stall cannot inflate the estimate.

use crate::capture::Snapshot;
use crate::config::{EstimationMode, TachConfig};
use crate::time::elapsed_since;

/// Tick-period estimate for one interval, before scaling to revolutions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Extrapolation {
    /// Boundary fragment before the first tick, after clamping (µs)
    pub pre_tick_us: f32,
    /// Boundary fragment after the last tick, after clamping (µs)
    pub post_tick_us: f32,
    /// Mean of the measured full tick periods (µs), 0 if fewer than two ticks
    pub avg_tick_period_us: f32,
    /// Tick periods covered by the interval
    pub periods: f32,
}

impl Extrapolation {
    const NONE: Self = Self {
        pre_tick_us: 0.0,
        post_tick_us: 0.0,
        avg_tick_period_us: 0.0,
        periods: 0.0,
    };
}

/// Estimate the tick periods covered by a closed interval
pub fn extrapolate(config: &TachConfig, snapshot: &Snapshot) -> Extrapolation {
    let ticks = snapshot.ticks;

    // No edges: the boundary fragments carry no information. One edge:
    // nothing to measure a period against. Branch out before any
    // `ticks - 1` denominator.
    if ticks < 2 {
        return Extrapolation::NONE;
    }

    let measured = ticks - 1;
    let pre = snapshot.pre_tick_us;
    let post = snapshot.post_tick_us;

    // First tick to last tick
    let span = elapsed_since(snapshot.end, snapshot.start)
        .saturating_sub(pre)
        .saturating_sub(post);
    let avg = span as f32 / measured as f32;

    match config.mode {
        EstimationMode::Counting => Extrapolation {
            pre_tick_us: pre as f32,
            post_tick_us: post as f32,
            avg_tick_period_us: avg,
            periods: ticks as f32,
        },
        EstimationMode::Fractional => {
            // Zero span only happens with debounce disabled and every edge
            // stamped in the same microsecond
            if ticks < config.min_ticks_for_extrapolation || span == 0 {
                return Extrapolation {
                    avg_tick_period_us: avg,
                    periods: measured as f32,
                    ..Extrapolation::NONE
                };
            }

            let pre = (pre as f32).min(avg);
            let post = (post as f32).min(avg);

            Extrapolation {
                pre_tick_us: pre,
                post_tick_us: post,
                avg_tick_period_us: avg,
                periods: measured as f32 + (pre + post) / avg,
            }
        }
    }
}
