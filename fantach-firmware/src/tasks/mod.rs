//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod capture;
pub mod estimator;
pub mod report;
pub mod status_led;

pub use capture::capture_task;
pub use estimator::estimator_task;
pub use report::report_task;
pub use status_led::status_led_task;
