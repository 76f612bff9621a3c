//! Hardware abstraction traits
//!
//! These traits define the interface between the estimation logic and the
//! board: where timestamps come from, and where results go.

pub mod clock;
pub mod report;

pub use clock::{ManualClock, MicrosClock};
pub use report::ReportSink;
