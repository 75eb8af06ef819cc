//! Bus responder publication
//!
//! The encoder board's sampling loop: read every encoder and the button
//! register, then publish the reply the bus request handler will send.

use embedded_hal::delay::DelayNs;
use op2001_core::{EncoderSampler, ReplyCache};
use op2001_hal::{InputPin, OutputPin};
use op2001_protocol::{BusReply, ButtonBitmap, BUS_ENCODERS};

use crate::shift_register::ShiftRegister;

/// Take one sample of all inputs and publish it
///
/// Returns the reply that was published.
pub fn publish_sample<L, C, D, T>(
    encoders: &EncoderSampler<BUS_ENCODERS>,
    buttons: &mut ShiftRegister<L, C, D, T>,
    cache: &ReplyCache,
) -> BusReply
where
    L: OutputPin,
    C: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    let positions = encoders.sample_all();
    let bitmap = ButtonBitmap::from_raw_inputs(buttons.read());
    let reply = BusReply::from_positions(&positions, bitmap);
    cache.publish(reply);
    reply
}
