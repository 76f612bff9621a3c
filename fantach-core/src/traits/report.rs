//! Reporting sink
//!
//! Receives one [`IntervalResult`] per closed interval. The core only
//! defines the fields and their units; encoding is up to the sink.

use crate::estimator::IntervalResult;

/// Consumer of completed interval estimates
pub trait ReportSink {
    /// Handle one interval result
    ///
    /// Called from the periodic context, never from edge capture.
    fn report(&mut self, result: &IntervalResult);
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report(&mut self, result: &IntervalResult) {
        (**self).report(result)
    }
}
