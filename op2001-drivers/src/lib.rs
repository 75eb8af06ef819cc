//! Hardware-driven glue for the input synchronization path
//!
//! Built on the `op2001-hal` traits so every piece runs against scripted
//! fakes on host:
//!
//! - Shift register button reader
//! - Serial link (frame receiver, parser and sink)
//! - Bus poller (requester side)
//! - Serial relay (bus to serial)
//! - Bus responder sample publication

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus_poller;
pub mod relay;
pub mod responder;
pub mod serial_link;
pub mod shift_register;

pub use bus_poller::BusPoller;
pub use relay::SerialRelay;
pub use responder::publish_sample;
pub use serial_link::SerialLink;
pub use shift_register::ShiftRegister;
