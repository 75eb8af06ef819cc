//! Bar display trait

use crate::pages::BarColor;

/// Draws one labelled bar of a GUI page
pub trait BarRenderer {
    type Error;

    /// Draw the bar at `position` (0-3, left to right)
    ///
    /// `value` is an encoder value in `0..=127`; implementations scale it to
    /// the bar height.
    fn draw_bar(
        &mut self,
        position: usize,
        value: i32,
        color: BarColor,
        label: &'static str,
    ) -> Result<(), Self::Error>;
}
