//! Audio chip register trait
//!
//! Register layout follows the SID: seven registers per voice, frequency
//! word low byte first.

use op2001_protocol::clamp_encoder;

/// Writes one synthesis chip register
pub trait RegisterWriter {
    type Error;

    /// Write `value` to `address` on chip `chip`
    fn write_register(&mut self, chip: u8, address: u8, value: u8) -> Result<(), Self::Error>;
}

/// Synthesis voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Voice {
    One,
    Two,
    Three,
}

impl Voice {
    /// First register of this voice's block
    pub const fn base_register(self) -> u8 {
        match self {
            Voice::One => 0,
            Voice::Two => 7,
            Voice::Three => 14,
        }
    }
}

/// Chip clock the frequency word is scaled against
const CHIP_CLOCK_HZ: u64 = 1_000_000;

/// Output frequency in Hz for an encoder position
pub fn voice_frequency_hz(position: i32) -> u32 {
    // clamp_encoder keeps the result non-negative
    200 + 10 * clamp_encoder(position).unsigned_abs()
}

/// Program a voice's oscillator from an encoder position
pub fn set_voice_frequency<W: RegisterWriter>(
    writer: &mut W,
    chip: u8,
    voice: Voice,
    position: i32,
) -> Result<(), W::Error> {
    let hz = u64::from(voice_frequency_hz(position));
    let word = (hz * 16_777_216 / CHIP_CLOCK_HZ) as u16;
    let [lo, hi] = word.to_le_bytes();

    let base = voice.base_register();
    writer.write_register(chip, base, lo)?;
    writer.write_register(chip, base + 1, hi)
}
