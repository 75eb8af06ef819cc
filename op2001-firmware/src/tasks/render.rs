//! Presentation task
//!
//! Waits for input changes, applies page switching and redraws the current
//! page.

use defmt::*;
use heapless::Vec;
use op2001_core::{ChannelId, ChannelKind, PageSelector, MAX_CHANNELS};

use crate::channels::{INPUT_CHANGED, SINK};
use crate::display::LogRenderer;

#[embassy_executor::task]
pub async fn render_task() {
    info!("Render task started");

    let mut pages = PageSelector::new();
    let mut renderer = LogRenderer;

    // Initial draw before any input arrives
    SINK.lock(|sink| {
        let _ = pages.current().render(&*sink.borrow(), &mut renderer);
    });

    loop {
        INPUT_CHANGED.wait().await;

        let (changes, sink) = SINK.lock(|sink| {
            let mut sink = sink.borrow_mut();
            let changes: Vec<ChannelId, { 2 * MAX_CHANNELS }> = sink.drain_changed().collect();
            (changes, sink.clone())
        });

        for id in &changes {
            let Some(value) = sink.channel(*id).map(|ch| ch.current()) else {
                continue;
            };
            debug!("{:?} {} -> {}", id.kind, id.index.get(), value);
            if id.kind == ChannelKind::Button && pages.on_button(*id, value != 0) {
                info!("Page: {}", pages.current().title());
            }
        }

        let _ = pages.current().render(&sink, &mut renderer);
    }
}
