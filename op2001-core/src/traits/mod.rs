//! Collaborator traits
//!
//! The synchronization core does not draw pixels or program the audio chip.
//! These traits are the seams where boards plug those in.

pub mod display;
pub mod register;

pub use display::BarRenderer;
pub use register::{set_voice_frequency, voice_frequency_hz, RegisterWriter, Voice};
