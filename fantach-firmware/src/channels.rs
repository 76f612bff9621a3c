//! Inter-task communication
//!
//! Defines the statics shared between the capture executor, the estimator
//! and the reporting tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, AtomicU32};

use fantach_core::{IntervalResult, SharedAccumulator};

/// Channel capacity for interval reports
const REPORT_CHANNEL_SIZE: usize = 4;

/// Tick accumulator shared by the capture task (interrupt executor) and the
/// estimator task (thread mode)
pub static SHARED_TACH: SharedAccumulator<CriticalSectionRawMutex> = SharedAccumulator::new();

/// Completed intervals, estimator -> reporter
pub static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, IntervalResult, REPORT_CHANNEL_SIZE> =
    Channel::new();

/// Reports dropped because the reporter fell behind
pub static REPORTS_DROPPED: AtomicU32 = AtomicU32::new(0);

/// True while the last closed interval measured a non-zero speed
pub static FAN_SPINNING: AtomicBool = AtomicBool::new(false);
