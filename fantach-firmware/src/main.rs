//! Fantach - Fan Tachometer Firmware
//!
//! Main firmware binary for RP2040-based fan monitors. Estimates fan speed
//! from microsecond edge timestamps, crediting the partial tick periods at
//! both ends of every measurement interval.
//!
//! Two execution contexts share one accumulator:
//! - the capture task runs on a high-priority interrupt executor and
//!   preempts everything else;
//! - the estimator, reporter and status LED run on the thread-mode
//!   executor.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Executor for the edge capture task
static EXECUTOR_CAPTURE: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_CAPTURE.on_interrupt()
}

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Fantach firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    let tach = config.tach;
    info!(
        "Tachometer: interval={}us, {} ticks/rev, bounce={}us, edge={:?}, max {} RPM",
        tach.interval_us,
        tach.ticks_per_revolution,
        tach.bounce_period_us,
        tach.edge,
        tach.max_trackable_rpm()
    );

    // Report UART (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.report.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();
    info!("UART initialized at {} baud", config.report.baud_rate);

    // Tachometer input (GPIO15); fan tach outputs are open-collector
    let tach_pin = Input::new(p.PIN_15, Pull::Up);

    // Onboard LED (GPIO25)
    let led = Output::new(p.PIN_25, Level::Low);

    // Capture runs above every thread-mode task
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let capture_spawner = EXECUTOR_CAPTURE.start(interrupt::SWI_IRQ_1);
    capture_spawner
        .spawn(tasks::capture_task(tach_pin, tach.edge, tach.bounce_period_us))
        .unwrap();

    spawner.spawn(tasks::estimator_task(tach)).unwrap();
    spawner.spawn(tasks::report_task(tx)).unwrap();
    spawner.spawn(tasks::status_led_task(led)).unwrap();

    info!("All tasks spawned, firmware running");
}
