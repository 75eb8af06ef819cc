//! Encoder board polling task

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};
use op2001_core::config::BusConfig;
use op2001_drivers::BusPoller;
use op2001_hal_rp2040::RpI2cBus;

use crate::channels::{INPUT_CHANGED, SINK, STATS};

#[embassy_executor::task]
pub async fn bus_poll_task(i2c: I2c<'static, I2C0, Blocking>, config: BusConfig) {
    info!(
        "Bus poll task started (address {=u8:#x}, every {} ms)",
        config.address, config.poll_interval_ms
    );

    let mut bus = RpI2cBus::new(i2c);
    let poller = BusPoller::new(config.address);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.poll_interval_ms)));

    loop {
        ticker.next().await;

        // The bus exchange runs with interrupts enabled; only the apply is locked
        let reply = poller.read(&mut bus);
        let result = SINK.lock(|sink| {
            STATS.lock(|stats| BusPoller::apply(reply, &mut *sink.borrow_mut(), &mut *stats.borrow_mut()))
        });

        match result {
            Ok(0) => {}
            Ok(changed) => {
                trace!("Bus: {} channel(s) changed", changed);
                INPUT_CHANGED.signal(());
            }
            Err(e) => warn!("Bus transaction failed: {:?}", e),
        }
    }
}
