//! Periodic link statistics

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::STATS;

const REPORT_INTERVAL_S: u64 = 10;

#[embassy_executor::task]
pub async fn stats_task() {
    let mut ticker = Ticker::every(Duration::from_secs(REPORT_INTERVAL_S));

    loop {
        ticker.next().await;
        let stats = STATS.lock(|stats| *stats.borrow());
        info!("Link stats: {:?}", stats);
    }
}
