//! RP2040 implementations of the `op2001-hal` traits
//!
//! - [`gpio`] - embassy-rp `Input`/`Output` pins
//! - [`uart`] - buffered UART halves, non-blocking receive
//! - [`i2c`] - blocking I2C master reads

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod uart;

pub use gpio::{RpInput, RpOutput};
pub use i2c::RpI2cBus;
pub use uart::{RpUartRx, RpUartTx};
