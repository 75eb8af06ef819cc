//! GUI pages
//!
//! Each page shows four bars, one per encoder slot. The current page is a
//! plain index into [`Page::ALL`]; drawing goes through [`BarRenderer`].

use crate::channel::{ChannelId, ChannelKind};
use crate::sink::InputSink;
use crate::traits::BarRenderer;

/// Button that cycles to the next page
pub const PAGE_BUTTON: usize = 3;

/// Bars per page
pub const BARS_PER_PAGE: usize = 4;

/// Bar fill colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BarColor {
    Red,
    Green,
    Blue,
    Yellow,
    Grey,
}

/// One bar on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSlot {
    pub label: &'static str,
    pub color: BarColor,
    /// Encoder shown in this bar; `None` draws an empty placeholder
    pub encoder: Option<usize>,
}

const fn bar(label: &'static str, color: BarColor, encoder: usize) -> BarSlot {
    BarSlot {
        label,
        color,
        encoder: Some(encoder),
    }
}

const PLACEHOLDER: BarSlot = BarSlot {
    label: "...",
    color: BarColor::Grey,
    encoder: None,
};

const MIXER: [BarSlot; BARS_PER_PAGE] = [
    bar("Osc1", BarColor::Red, 0),
    bar("Osc2", BarColor::Green, 1),
    bar("Noise", BarColor::Blue, 2),
    PLACEHOLDER,
];

const OSCILLATOR: [BarSlot; BARS_PER_PAGE] = [
    bar("Freq", BarColor::Red, 0),
    bar("Shape", BarColor::Yellow, 1),
    bar("PWM", BarColor::Blue, 2),
    PLACEHOLDER,
];

const FILTER: [BarSlot; BARS_PER_PAGE] = [
    bar("Freq", BarColor::Red, 0),
    bar("Resonance", BarColor::Yellow, 1),
    bar("Attenuation", BarColor::Blue, 2),
    bar("Type", BarColor::Green, 3),
];

const ENVELOPE: [BarSlot; BARS_PER_PAGE] = [
    bar("Attack", BarColor::Red, 0),
    bar("Decay", BarColor::Yellow, 1),
    bar("Sustain", BarColor::Blue, 2),
    bar("Release", BarColor::Green, 3),
];

/// Page kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    Mixer,
    Oscillator,
    Filter,
    Envelope,
}

impl Page {
    /// Pages in selection order
    pub const ALL: [Page; 4] = [Page::Mixer, Page::Oscillator, Page::Filter, Page::Envelope];

    pub fn title(self) -> &'static str {
        match self {
            Page::Mixer => "Mixer",
            Page::Oscillator => "Oscillator",
            Page::Filter => "Filter",
            Page::Envelope => "Envelope",
        }
    }

    pub fn slots(self) -> &'static [BarSlot; BARS_PER_PAGE] {
        match self {
            Page::Mixer => &MIXER,
            Page::Oscillator => &OSCILLATOR,
            Page::Filter => &FILTER,
            Page::Envelope => &ENVELOPE,
        }
    }

    /// Draw every bar with the sink's current encoder values
    pub fn render<const N: usize, R: BarRenderer>(
        self,
        sink: &InputSink<N>,
        renderer: &mut R,
    ) -> Result<(), R::Error> {
        for (position, slot) in self.slots().iter().enumerate() {
            let value = slot.encoder.map_or(0, |i| sink.encoder_value(i));
            renderer.draw_bar(position, value, slot.color, slot.label)?;
        }
        Ok(())
    }
}

/// Current page index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSelector {
    index: usize,
}

impl PageSelector {
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    pub fn current(&self) -> Page {
        Page::ALL[self.index % Page::ALL.len()]
    }

    pub fn next(&mut self) -> Page {
        self.index = (self.index + 1) % Page::ALL.len();
        self.current()
    }

    pub fn previous(&mut self) -> Page {
        self.index = (self.index + Page::ALL.len() - 1) % Page::ALL.len();
        self.current()
    }

    /// React to a drained button change
    ///
    /// Returns true if the page switched.
    pub fn on_button(&mut self, id: ChannelId, pressed: bool) -> bool {
        if id.kind == ChannelKind::Button && id.index.get() == PAGE_BUTTON && pressed {
            self.next();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::channel::ChannelIndex;
    use op2001_protocol::Message;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingRenderer {
        bars: Vec<(usize, i32, BarColor, &'static str)>,
    }

    impl BarRenderer for RecordingRenderer {
        type Error = ();

        fn draw_bar(
            &mut self,
            position: usize,
            value: i32,
            color: BarColor,
            label: &'static str,
        ) -> Result<(), ()> {
            self.bars.push((position, value, color, label));
            Ok(())
        }
    }

    #[test]
    fn test_selector_wraps_both_ways() {
        let mut pages = PageSelector::new();
        assert_eq!(pages.current(), Page::Mixer);
        assert_eq!(pages.previous(), Page::Envelope);
        assert_eq!(pages.next(), Page::Mixer);

        for _ in 0..4 {
            pages.next();
        }
        assert_eq!(pages.current(), Page::Mixer);
    }

    #[test]
    fn test_page_button_press_only() {
        let mut pages = PageSelector::new();
        let page_button = ChannelId::button(ChannelIndex::new(3, 4).unwrap());
        let other_button = ChannelId::button(ChannelIndex::new(1, 4).unwrap());
        let encoder = ChannelId::encoder(ChannelIndex::new(3, 4).unwrap());

        assert!(!pages.on_button(page_button, false));
        assert!(!pages.on_button(other_button, true));
        assert!(!pages.on_button(encoder, true));
        assert!(pages.on_button(page_button, true));
        assert_eq!(pages.current(), Page::Oscillator);
    }

    #[test]
    fn test_render_mixer() {
        let mut sink = InputSink::<4>::new();
        sink.apply(&Message::encoder(0, 64)).unwrap();
        sink.apply(&Message::encoder(3, 99)).unwrap();

        let mut renderer = RecordingRenderer::default();
        Page::Mixer.render(&sink, &mut renderer).unwrap();

        assert_eq!(renderer.bars.len(), 4);
        assert_eq!(renderer.bars[0], (0, 64, BarColor::Red, "Osc1"));
        // Placeholder ignores encoder 3
        assert_eq!(renderer.bars[3], (3, 0, BarColor::Grey, "..."));
    }

    #[test]
    fn test_every_page_has_four_bars() {
        for page in Page::ALL {
            assert_eq!(page.slots().len(), BARS_PER_PAGE);
            assert!(!page.title().is_empty());
        }
    }
}
