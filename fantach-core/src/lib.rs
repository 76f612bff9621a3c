//! Board-agnostic core logic for the fan tachometer firmware
//!
//! This crate contains everything needed to turn a stream of tachometer
//! edge timestamps into RPM estimates, without depending on any specific
//! hardware:
//!
//! - Wraparound-safe microsecond arithmetic
//! - Tick capture (debounce + interval accumulator)
//! - The guarded hand-off between the edge producer and the periodic consumer
//! - Fractional-cycle extrapolation and interval bookkeeping
//! - Configuration types and the embedded config parser
//! - Clock and reporting traits
//!
//! # Data flow
//!
//! ```text
//!  edge IRQ ──► SharedAccumulator::record_edge ──┐
//!                                                │  (critical section)
//!  periodic ──► IntervalEstimator::close ◄───────┘
//!                     │
//!                     ▼
//!               IntervalResult ──► ReportSink
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod capture;
pub mod config;
pub mod estimator;
pub mod time;
pub mod traits;

pub use capture::{EdgeOutcome, IntervalAccumulator, SharedAccumulator, Snapshot};
pub use config::{EdgePolarity, EstimationMode, FanConfig, TachConfig};
pub use estimator::{IntervalEstimator, IntervalResult};
pub use time::Micros;
pub use traits::{MicrosClock, ReportSink};
