//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod bus_poll;
pub mod render;
pub mod serial_rx;
pub mod stats;

pub use bus_poll::bus_poll_task;
pub use render::render_task;
pub use serial_rx::serial_rx_task;
pub use stats::stats_task;
