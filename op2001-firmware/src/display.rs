//! Bar renderer for the control node
//!
//! The TFT panel driver is not part of this firmware; bars are reported on
//! the defmt log instead.

use core::convert::Infallible;

use defmt::*;
use op2001_core::traits::BarRenderer;
use op2001_core::BarColor;

pub struct LogRenderer;

impl BarRenderer for LogRenderer {
    type Error = Infallible;

    fn draw_bar(
        &mut self,
        position: usize,
        value: i32,
        color: BarColor,
        label: &'static str,
    ) -> Result<(), Infallible> {
        debug!("bar {}: {} = {} ({:?})", position, label, value, color);
        Ok(())
    }
}
