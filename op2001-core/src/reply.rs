//! Bus responder reply cache
//!
//! The encoder board's main loop publishes a fresh snapshot every cycle;
//! the bus request handler may fire at any point in that cycle. Both sides go
//! through a critical section so a reply is never assembled from two
//! different samples.

use core::cell::Cell;

use critical_section::Mutex;
use op2001_protocol::{BusReply, BUS_REPLY_LEN};

/// Last published reply
pub struct ReplyCache {
    reply: Mutex<Cell<BusReply>>,
}

impl Default for ReplyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyCache {
    /// Cache holding an all-zero, nothing-pressed reply; usable in a `static`
    pub const fn new() -> Self {
        Self {
            reply: Mutex::new(Cell::new(BusReply {
                encoders: [0; op2001_protocol::BUS_ENCODERS],
                buttons: op2001_protocol::ButtonBitmap::RELEASED,
            })),
        }
    }

    /// Replace the cached reply
    pub fn publish(&self, reply: BusReply) {
        critical_section::with(|cs| self.reply.borrow(cs).set(reply));
    }

    /// Copy of the cached reply
    pub fn snapshot(&self) -> BusReply {
        critical_section::with(|cs| self.reply.borrow(cs).get())
    }

    /// Cached reply in wire form
    pub fn snapshot_bytes(&self) -> [u8; BUS_REPLY_LEN] {
        self.snapshot().encode()
    }
}
