//! OP-2001 audio node
//!
//! Polls the encoder board's snapshot over I2C, programs the synthesis
//! voices from the first three encoders, and relays every change to the
//! display node as serial frames.

#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartTx, Config as UartConfig, Uart};
use embassy_time::{Duration, Ticker};
use op2001_core::config::{parse_config, NodeConfig};
use op2001_core::traits::{set_voice_frequency, RegisterWriter, Voice};
use op2001_core::{InputSink, LinkStats, MAX_CHANNELS};
use op2001_drivers::{BusPoller, SerialRelay};
use op2001_hal::i2c::I2cConfig;
use op2001_hal_rp2040::{RpI2cBus, RpUartTx};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Embedded configuration, validated by build.rs
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

/// Sound chip select for the voice registers
const SOUND_CHIP: u8 = 0;

/// Cycles between link statistics reports
const STATS_EVERY: u32 = 250;

static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Register writer reporting on the defmt log
///
/// The chip bus itself is driven by the synthesis engine, outside this
/// firmware.
struct LogChip;

impl RegisterWriter for LogChip {
    type Error = Infallible;

    fn write_register(&mut self, chip: u8, address: u8, value: u8) -> Result<(), Infallible> {
        trace!("chip {} reg {=u8:#04x} <- {=u8:#04x}", chip, address, value);
        Ok(())
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("OP-2001 audio node starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded config rejected ({:?}), using defaults", e);
            NodeConfig::default()
        }
    };

    // Serial link to the display node (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();

    // Encoder board bus (GPIO5 SCL, GPIO4 SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::STANDARD.frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    spawner.spawn(relay_task(i2c, tx, config)).unwrap();
}

/// Poll, program voices, relay
#[embassy_executor::task]
async fn relay_task(i2c: I2c<'static, I2C0, Blocking>, tx: BufferedUartTx, config: NodeConfig) {
    info!(
        "Relay task started (address {=u8:#x}, every {} ms)",
        config.bus.address, config.bus.poll_interval_ms
    );

    let mut bus = RpI2cBus::new(i2c);
    let mut tx = RpUartTx::new(tx);
    let poller = BusPoller::new(config.bus.address);
    let relay = SerialRelay::new();
    let mut sink = InputSink::<MAX_CHANNELS>::with_channels(usize::from(config.inputs.channels));
    let mut stats = LinkStats::new();
    let mut chip = LogChip;
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.bus.poll_interval_ms)));
    let mut cycles = 0u32;

    loop {
        ticker.next().await;

        match poller.poll(&mut bus, &mut sink, &mut stats) {
            Ok(0) => {}
            Ok(changed) => {
                debug!("{} channel(s) changed", changed);
                for (voice, encoder) in [(Voice::One, 0), (Voice::Two, 1), (Voice::Three, 2)] {
                    let _ = set_voice_frequency(&mut chip, SOUND_CHIP, voice, sink.encoder_value(encoder));
                }
            }
            Err(e) => warn!("Bus transaction failed: {:?}", e),
        }

        // Includes changes left pending by a failed write last cycle
        if sink.has_changes() {
            match relay.forward(&mut tx, &mut sink) {
                Ok(frames) => trace!("Relayed {} frame(s)", frames),
                Err(e) => warn!("Serial relay failed: {:?}", e),
            }
        }

        cycles = cycles.wrapping_add(1);
        if cycles % STATS_EVERY == 0 {
            info!("Link stats: {:?}", stats);
        }
    }
}
