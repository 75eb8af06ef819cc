//! Serial receive task
//!
//! Frames from the audio node arrive at 9600 baud, under 1000 bytes a
//! second, so draining the UART ring buffer every few milliseconds keeps
//! up with room to spare.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Duration, Ticker};
use op2001_drivers::SerialLink;
use op2001_hal_rp2040::RpUartRx;

use crate::channels::{INPUT_CHANGED, SINK, STATS};

const POLL_INTERVAL_MS: u64 = 5;

#[embassy_executor::task]
pub async fn serial_rx_task(rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut rx = RpUartRx::new(rx);
    let mut link = SerialLink::new();
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let (changed, dropped) = SINK.lock(|sink| {
            STATS.lock(|stats| {
                let mut stats = stats.borrow_mut();
                let before = stats.dropped_frames();
                let changed = link.poll_all(&mut rx, &mut *sink.borrow_mut(), &mut *stats);
                (changed, stats.dropped_frames() - before)
            })
        });

        if dropped > 0 {
            warn!("Dropped {} serial frame(s)", dropped);
        }
        if changed > 0 {
            trace!("Serial: {} channel(s) changed", changed);
            INPUT_CHANGED.signal(());
        }
    }
}
