//! Snapshot reply for the polled I2C bus
//!
//! Reply format (9 bytes, no request parameters):
//! ```text
//! ┌────────┬────────┬────────┬────────┬─────────┐
//! │ ENC 0  │ ENC 1  │ ENC 2  │ ENC 3  │ BUTTONS │
//! │ i16 BE │ i16 BE │ i16 BE │ i16 BE │ 1B      │
//! └────────┴────────┴────────┴────────┴─────────┘
//! ```
//!
//! Button byte: bit `0x08 >> i` is button `i` for `i` in 0..4, upper nibble
//! unused. In the reply `1` always means pressed.

/// Default 7-bit address of the encoder board
pub const ENCODER_BOARD_ADDRESS: u8 = 0x08;

/// Encoders carried per reply
pub const BUS_ENCODERS: usize = 4;

/// Buttons carried per reply
pub const BUS_BUTTONS: usize = 4;

/// Reply length in bytes
pub const BUS_REPLY_LEN: usize = BUS_ENCODERS * 2 + 1;

/// Errors that can occur when decoding a bus reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Reply was shorter or longer than [`BUS_REPLY_LEN`]
    Incomplete,
}

/// Button states in reply polarity (1 = pressed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonBitmap(u8);

impl ButtonBitmap {
    /// Bitmap with no button pressed
    pub const RELEASED: Self = Self(0);

    /// Convert a raw pin/shift-register read (0 = pressed)
    ///
    /// This is the single polarity flip on the input path.
    pub const fn from_raw_inputs(raw: u8) -> Self {
        Self(!raw)
    }

    /// Wrap a byte already in reply polarity
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Byte as sent on the wire
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Bitmap from per-button states, buttons past [`BUS_BUTTONS`] ignored
    pub fn from_states(pressed: &[bool]) -> Self {
        let mut bits = 0;
        for (i, &p) in pressed.iter().take(BUS_BUTTONS).enumerate() {
            if p {
                bits |= Self::mask(i);
            }
        }
        Self(bits)
    }

    /// Returns true if button `index` is pressed
    ///
    /// Indices past [`BUS_BUTTONS`] read as released.
    pub fn is_pressed(self, index: usize) -> bool {
        index < BUS_BUTTONS && self.0 & Self::mask(index) != 0
    }

    /// All carried buttons, in index order
    pub fn states(self) -> [bool; BUS_BUTTONS] {
        core::array::from_fn(|i| self.is_pressed(i))
    }

    const fn mask(index: usize) -> u8 {
        0x08 >> index
    }
}

/// One decoded snapshot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusReply {
    /// Quantized encoder positions
    pub encoders: [i16; BUS_ENCODERS],
    /// Button states
    pub buttons: ButtonBitmap,
}

impl BusReply {
    /// Build a reply from sampled positions, saturating to 16 bits
    pub fn from_positions(positions: &[i32; BUS_ENCODERS], buttons: ButtonBitmap) -> Self {
        Self {
            encoders: positions.map(saturate_i16),
            buttons,
        }
    }

    /// Encode as the 9-byte wire reply
    pub fn encode(&self) -> [u8; BUS_REPLY_LEN] {
        let mut out = [0u8; BUS_REPLY_LEN];
        for (chunk, value) in out.chunks_exact_mut(2).zip(self.encoders) {
            chunk.copy_from_slice(&value.to_be_bytes());
        }
        out[BUS_REPLY_LEN - 1] = self.buttons.bits();
        out
    }

    /// Decode a wire reply
    pub fn decode(bytes: &[u8]) -> Result<Self, BusError> {
        if bytes.len() != BUS_REPLY_LEN {
            return Err(BusError::Incomplete);
        }

        let mut encoders = [0i16; BUS_ENCODERS];
        for (value, chunk) in encoders.iter_mut().zip(bytes.chunks_exact(2)) {
            *value = i16::from_be_bytes([chunk[0], chunk[1]]);
        }

        Ok(Self {
            encoders,
            buttons: ButtonBitmap::from_bits(bytes[BUS_REPLY_LEN - 1]),
        })
    }

    /// Encoder positions widened for the channel model
    pub fn positions(&self) -> [i32; BUS_ENCODERS] {
        self.encoders.map(i32::from)
    }
}

fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
