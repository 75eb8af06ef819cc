//! OP-2001 encoder/button board
//!
//! Samples four quadrature encoders and a shift register of buttons, and
//! answers every I2C read with the latest 9-byte snapshot.
//!
//! Encoder edges are decoded as they arrive; the sampling loop takes a
//! quantized reading of every counter each cycle. Waiting out the cycle also
//! debounces the buttons.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c;
use embassy_rp::i2c_slave::{self, Command, I2cSlave, ReadStatus};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker};
use op2001_core::config::{parse_config, NodeConfig};
use op2001_core::{EncoderSampler, ReplyCache};
use op2001_drivers::{publish_sample, ShiftRegister};
use op2001_hal_rp2040::{RpInput, RpOutput};
use op2001_protocol::{BusReply, BUS_ENCODERS, BUS_REPLY_LEN};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Embedded configuration, validated by build.rs
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

/// Quadrature counters, written by the edge tasks
static ENCODERS: EncoderSampler<BUS_ENCODERS> = EncoderSampler::new();

/// Reply served to the bus requester
static REPLY: ReplyCache = ReplyCache::new();

type Buttons = ShiftRegister<RpOutput<'static>, RpOutput<'static>, RpInput<'static>, Delay>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("OP-2001 encoder board starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded config rejected ({:?}), using defaults", e);
            NodeConfig::default()
        }
    };
    if usize::from(config.inputs.channels) != BUS_ENCODERS {
        warn!(
            "Config asks for {} channels; the board always reports {}",
            config.inputs.channels, BUS_ENCODERS
        );
    }

    // Encoders: A/B pairs on GPIO6-13, pulled up
    let encoders = [
        (Input::new(p.PIN_6, Pull::Up), Input::new(p.PIN_7, Pull::Up)),
        (Input::new(p.PIN_8, Pull::Up), Input::new(p.PIN_9, Pull::Up)),
        (Input::new(p.PIN_10, Pull::Up), Input::new(p.PIN_11, Pull::Up)),
        (Input::new(p.PIN_12, Pull::Up), Input::new(p.PIN_13, Pull::Up)),
    ];

    // Button shift register: load GPIO14, clock GPIO15, data GPIO16
    let buttons = ShiftRegister::new(
        RpOutput::new(Output::new(p.PIN_14, Level::Low)),
        RpOutput::new(Output::new(p.PIN_15, Level::Low)),
        RpInput::new(Input::new(p.PIN_16, Pull::None)),
        Delay,
    );

    // Bus responder (GPIO5 SCL, GPIO4 SDA)
    let mut slave_config = i2c_slave::Config::default();
    slave_config.addr = u16::from(config.bus.address);
    let responder = I2cSlave::new(p.I2C0, p.PIN_5, p.PIN_4, Irqs, slave_config);

    for (index, (a, b)) in encoders.into_iter().enumerate() {
        spawner.spawn(encoder_task(index, a, b)).unwrap();
    }
    spawner
        .spawn(sample_task(buttons, config.bus.poll_interval_ms))
        .unwrap();
    spawner.spawn(responder_task(responder)).unwrap();

    info!("All tasks spawned (address {=u8:#x})", config.bus.address);
}

/// Edge decoder for one encoder
#[embassy_executor::task(pool_size = 4)]
async fn encoder_task(index: usize, mut a: Input<'static>, mut b: Input<'static>) {
    let Some(counter) = ENCODERS.counter(index) else {
        return;
    };
    counter.prime(a.is_high(), b.is_high());
    info!("Encoder {} task started", index);

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        counter.on_edge(a.is_high(), b.is_high());
    }
}

/// Sampling loop: quantize encoders, read buttons, publish
#[embassy_executor::task]
async fn sample_task(mut buttons: Buttons, interval_ms: u32) {
    info!("Sample task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(interval_ms)));
    let mut last = BusReply::default();

    loop {
        let reply = publish_sample(&ENCODERS, &mut buttons, &REPLY);
        if reply != last {
            debug!(
                "Sample: encoders {:?}, buttons {=u8:#06b}",
                reply.encoders,
                reply.buttons.bits()
            );
            last = reply;
        }
        ticker.next().await;
    }
}

/// Answers reads with the last published snapshot
#[embassy_executor::task]
async fn responder_task(mut dev: I2cSlave<'static, I2C0>) {
    info!("Responder task started");

    let mut buf = [0u8; BUS_REPLY_LEN];

    loop {
        match dev.listen(&mut buf).await {
            Ok(Command::Read) | Ok(Command::WriteRead(_)) => {
                let reply = REPLY.snapshot_bytes();
                match dev.respond_to_read(&reply).await {
                    Ok(ReadStatus::Done) => trace!("Snapshot sent"),
                    Ok(ReadStatus::NeedMoreBytes) => {
                        warn!("Requester read past the reply");
                        let _ = dev.respond_till_stop(0).await;
                    }
                    Ok(ReadStatus::LeftoverBytes(n)) => {
                        warn!("Requester stopped early, {} byte(s) unsent", n);
                    }
                    Err(e) => warn!("Responder error: {:?}", e),
                }
            }
            // Writes carry nothing for this board
            Ok(Command::Write(_)) | Ok(Command::GeneralCall(_)) => {}
            Err(e) => warn!("Listen error: {:?}", e),
        }
    }
}
