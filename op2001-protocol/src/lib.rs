//! OP-2001 Input Synchronization Protocol
//!
//! This crate defines the two wire formats the instrument's boards use to
//! share encoder and button state.
//!
//! # Serial link
//!
//! ASCII frames over a 9600 baud UART, one update per frame:
//! ```text
//! ┌──────┬─────────┬───┬─────────┬───┐
//! │ KIND │ CHANNEL │ : │ VALUE   │ ; │
//! │ e|b  │ decimal │   │ decimal │   │
//! └──────┴─────────┴───┴─────────┴───┘
//! ```
//! `\r`, `\n` and `\0` between or inside frames are ignored.
//!
//! # Polled bus
//!
//! The controlling board reads a fixed 9-byte snapshot from the encoder board
//! over I2C; see [`bus`].
//!
//! Neither format carries a checksum. The serial receiver resynchronizes on
//! the next terminator and the bus reply is simply read again next cycle.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod frame;
pub mod messages;

pub use bus::{
    BusError, BusReply, ButtonBitmap, BUS_BUTTONS, BUS_ENCODERS, BUS_REPLY_LEN,
    ENCODER_BOARD_ADDRESS,
};
pub use frame::{Frame, FrameError, FrameReceiver, RxState, FRAME_CAPACITY, FRAME_TERMINATOR};
pub use messages::{clamp_encoder, Message, MessageKind, ParseError, ENCODER_MAX, ENCODER_MIN};
