//! Interval reporting
//!
//! The estimator hands each result to [`ChannelSink`]; [`report_task`]
//! logs it and writes one CSV line per interval to the report UART:
//!
//! ```text
//! sequence,start,end,ticks,pre_us,post_us,avg_us,cycles,rpm,bounced
//! ```

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;
use portable_atomic::Ordering;

use fantach_core::{IntervalResult, ReportSink};

use crate::channels::{FAN_SPINNING, REPORTS_DROPPED, REPORT_CHANNEL};

/// Longest report line
const LINE_LEN: usize = 128;

/// Report sink feeding the reporter task
///
/// Never blocks the estimator: when the queue is full the result is
/// dropped and counted.
pub struct ChannelSink;

impl ReportSink for ChannelSink {
    fn report(&mut self, result: &IntervalResult) {
        FAN_SPINNING.store(!result.is_stopped(), Ordering::Relaxed);

        if REPORT_CHANNEL.try_send(*result).is_err() {
            REPORTS_DROPPED.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Report task - logs results and writes them to the UART
#[embassy_executor::task]
pub async fn report_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Report task started");

    loop {
        let result = REPORT_CHANNEL.receive().await;

        let dropped = REPORTS_DROPPED.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!("Reporter fell behind, {} intervals dropped", dropped);
        }

        debug!("{:?}", result);
        info!("Fan speed: {} RPM ({} ticks)", result.rpm, result.ticks);

        let line = match format_line(&result) {
            Ok(line) => line,
            Err(_) => {
                warn!("Report line overflow for interval {}", result.sequence);
                continue;
            }
        };

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to write report: {:?}", e);
        }
    }
}

/// Format one result as a CSV line
fn format_line(result: &IntervalResult) -> Result<String<LINE_LEN>, core::fmt::Error> {
    let mut line = String::new();
    write!(
        line,
        "{},{},{},{},{},{},{},{:.3},{:.1},{}\r\n",
        result.sequence,
        result.start,
        result.end,
        result.ticks,
        result.pre_tick_us,
        result.post_tick_us,
        result.avg_tick_period_us,
        result.cycles,
        result.rpm,
        result.bounced,
    )?;
    Ok(line)
}
