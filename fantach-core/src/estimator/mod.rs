//! Interval estimation
//!
//! The consumer side: once per interval, take the accumulator's counters
//! and turn them into a fractional-cycle RPM estimate.

pub mod extrapolate;
pub mod interval;
pub mod result;

pub use extrapolate::{extrapolate, Extrapolation};
pub use interval::IntervalEstimator;
pub use result::IntervalResult;
