//! Tick capture
//!
//! The producer side of the estimator: debounces tachometer edges and
//! aggregates them into the currently open interval. [`SharedAccumulator`]
//! is the only state shared between the edge context and the periodic
//! context.

pub mod accumulator;
pub mod shared;

pub use accumulator::{EdgeOutcome, IntervalAccumulator, Snapshot};
pub use shared::SharedAccumulator;
