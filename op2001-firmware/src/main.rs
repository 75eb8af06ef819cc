//! OP-2001 display/control node
//!
//! Collects input changes from two paths into one channel table:
//!
//! - serial frames relayed by the audio node (UART0)
//! - snapshots polled directly from the encoder board (I2C0)
//!
//! and redraws the current GUI page whenever a channel changes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use op2001_core::InputSink;
use op2001_hal::i2c::I2cConfig;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART ring buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("OP-2001 control node starting...");

    let p = embassy_rp::init(Default::default());
    let config = config::load();

    channels::SINK.lock(|sink| {
        *sink.borrow_mut() = InputSink::with_channels(usize::from(config.inputs.channels));
    });

    // Serial link from the audio node (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baudrate);

    // Encoder board bus (GPIO5 SCL, GPIO4 SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::STANDARD.frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    info!("I2C initialized");

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::bus_poll_task(i2c, config.bus)).unwrap();
    spawner.spawn(tasks::render_task()).unwrap();
    spawner.spawn(tasks::stats_task()).unwrap();

    info!("All tasks spawned, firmware running");
}
