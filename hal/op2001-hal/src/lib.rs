//! OP-2001 Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the input-synchronization code is
//! written against. Chip-specific crates implement them, and the host test
//! suites implement them with scripted fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Node firmware (encoder, audio, control)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  op2001-drivers (serial link, bus poll) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  op2001-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  op2001-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Shift register and encoder pins
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial frame transport
//! - [`i2c::I2cBus`] - Polled snapshot bus (requester side)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use uart::{UartRx, UartTx};
