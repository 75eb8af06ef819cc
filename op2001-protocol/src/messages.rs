//! Input update messages carried by serial frames
//!
//! Grammar: `e<channel>:<value>;` for encoders, `b<channel>:<value>;` for
//! buttons. Both numbers are decimal and may carry a sign.

use core::fmt::Write;

use heapless::String;

use crate::frame::{Frame, FRAME_CAPACITY, FRAME_TERMINATOR};

/// Highest encoder value delivered to the presentation layer
pub const ENCODER_MAX: i32 = 127;

/// Lowest encoder value delivered to the presentation layer
pub const ENCODER_MIN: i32 = 0;

// Wire kind bytes
const KIND_ENCODER: u8 = b'e';
const KIND_BUTTON: u8 = b'b';
const FIELD_SEPARATOR: u8 = b':';

/// Errors that can occur when decoding a frame into a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Leading byte is neither `e` nor `b`
    UnknownKind,
    /// Numeric field or separator could not be parsed
    Malformed,
}

/// What a message updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Quantized encoder position
    EncoderUpdate,
    /// Button state (1 = pressed)
    ButtonUpdate,
}

impl MessageKind {
    /// Kind from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KIND_ENCODER => Some(MessageKind::EncoderUpdate),
            KIND_BUTTON => Some(MessageKind::ButtonUpdate),
            _ => None,
        }
    }

    /// Wire byte for this kind
    pub fn to_byte(self) -> u8 {
        match self {
            MessageKind::EncoderUpdate => KIND_ENCODER,
            MessageKind::ButtonUpdate => KIND_BUTTON,
        }
    }
}

/// A decoded input update
///
/// `channel` is not range-checked here; the sink owns the channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub kind: MessageKind,
    pub channel: i32,
    pub value: i32,
}

impl Message {
    /// Encoder update, clamped to the displayable range
    pub fn encoder(channel: i32, value: i32) -> Self {
        Self {
            kind: MessageKind::EncoderUpdate,
            channel,
            value: clamp_encoder(value),
        }
    }

    /// Button update
    pub fn button(channel: i32, pressed: bool) -> Self {
        Self {
            kind: MessageKind::ButtonUpdate,
            channel,
            value: i32::from(pressed),
        }
    }

    /// Button state; meaningless for encoder updates
    pub fn is_pressed(&self) -> bool {
        self.value != 0
    }

    /// Parse a completed frame
    pub fn from_frame(frame: &Frame) -> Result<Self, ParseError> {
        Self::parse(frame.as_bytes())
    }

    /// Parse raw frame bytes, terminator included
    ///
    /// Encoder values are clamped to `ENCODER_MIN..=ENCODER_MAX`; button
    /// values are normalized to 0 or 1.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let (&first, rest) = bytes.split_first().ok_or(ParseError::UnknownKind)?;
        let kind = MessageKind::from_byte(first).ok_or(ParseError::UnknownKind)?;

        let body = rest
            .strip_suffix(&[FRAME_TERMINATOR])
            .ok_or(ParseError::Malformed)?;
        let sep = body
            .iter()
            .position(|&b| b == FIELD_SEPARATOR)
            .ok_or(ParseError::Malformed)?;

        let channel = parse_int(&body[..sep])?;
        let value = parse_int(&body[sep + 1..])?;

        Ok(match kind {
            MessageKind::EncoderUpdate => Self::encoder(channel, value),
            MessageKind::ButtonUpdate => Self::button(channel, value != 0),
        })
    }

    /// Encode into wire text, terminator included
    pub fn encode(&self) -> String<FRAME_CAPACITY> {
        let mut out = String::new();
        // Two i32 fields plus kind, separator and terminator stay well under
        // capacity
        let _ = write!(
            out,
            "{}{}:{};",
            self.kind.to_byte() as char,
            self.channel,
            self.value
        );
        out
    }

    /// Encode into a frame
    pub fn to_frame(&self) -> Frame {
        Frame {
            bytes: self.encode().into_bytes(),
        }
    }
}

/// Clamp an encoder value to the displayable range
pub fn clamp_encoder(value: i32) -> i32 {
    value.clamp(ENCODER_MIN, ENCODER_MAX)
}

/// Parse a signed decimal integer occupying the whole slice
fn parse_int(digits: &[u8]) -> Result<i32, ParseError> {
    core::str::from_utf8(digits)
        .map_err(|_| ParseError::Malformed)?
        .parse::<i32>()
        .map_err(|_| ParseError::Malformed)
}
