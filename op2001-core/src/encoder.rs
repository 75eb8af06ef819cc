//! Rotary encoder sampling
//!
//! Edge callbacks decode A/B quadrature transitions into a raw count; the
//! polling loop reads a quantized position from it. The two sides share only
//! atomics: one writer (the edge callback), one reader (the poller).
//!
//! Quadrature encoding:
//! - Each full A/B cycle is four transitions (quarter steps)
//! - The raw count latches at the two rest states, `00` and `11`, so it moves
//!   twice per cycle
//! - The quantized position halves the raw count, rounding toward zero, so
//!   it moves once per physical click whichever phase fires first

use portable_atomic::{AtomicI32, AtomicU8, Ordering};

/// Quarter-step delta indexed by `(previous_state << 2) | state`
///
/// Zero entries are either no movement or a skipped (invalid) transition.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Map a raw quadrature count to a detent position
///
/// Odd counts round toward zero: `4` and `5` both give `2`, `-5` gives `-2`.
pub const fn quantize(raw: i32) -> i32 {
    raw / 2
}

fn phase_state(a: bool, b: bool) -> u8 {
    (u8::from(a) << 1) | u8::from(b)
}

/// Interrupt-updated accumulator for one encoder
#[derive(Debug)]
pub struct QuadratureCounter {
    state: AtomicU8,
    quarter_steps: AtomicI32,
    raw: AtomicI32,
}

impl Default for QuadratureCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureCounter {
    /// Counter at zero, assuming both phases idle high
    #[allow(clippy::declare_interior_mutable_const)]
    pub const NEW: Self = Self::new();

    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(0b11),
            quarter_steps: AtomicI32::new(0),
            raw: AtomicI32::new(0),
        }
    }

    /// Record the phase levels read at startup
    pub fn prime(&self, a: bool, b: bool) {
        self.state.store(phase_state(a, b), Ordering::Relaxed);
    }

    /// Hardware edge callback
    ///
    /// Call with the current A/B levels whenever either phase changes. Only
    /// one context may call this per counter.
    pub fn on_edge(&self, a: bool, b: bool) {
        let state = phase_state(a, b);
        let previous = self.state.load(Ordering::Relaxed);
        if state == previous {
            return;
        }
        self.state.store(state, Ordering::Relaxed);

        let delta = TRANSITIONS[usize::from((previous << 2) | state)];
        if delta == 0 {
            return;
        }

        let quarter = self.quarter_steps.load(Ordering::Relaxed) + i32::from(delta);
        self.quarter_steps.store(quarter, Ordering::Relaxed);

        if state == 0b00 || state == 0b11 {
            self.raw.store(quarter >> 1, Ordering::Release);
        }
    }

    /// Raw latched count, read as one atomic snapshot
    pub fn raw_count(&self) -> i32 {
        self.raw.load(Ordering::Acquire)
    }

    /// Quantized detent position
    pub fn sample(&self) -> i32 {
        quantize(self.raw_count())
    }
}

/// Fixed set of `N` encoders
#[derive(Debug)]
pub struct EncoderSampler<const N: usize> {
    counters: [QuadratureCounter; N],
}

impl<const N: usize> Default for EncoderSampler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EncoderSampler<N> {
    /// All counters at zero; usable in a `static`
    pub const fn new() -> Self {
        Self {
            counters: [QuadratureCounter::NEW; N],
        }
    }

    /// Counter for one encoder, for wiring into its edge callback
    pub fn counter(&self, channel: usize) -> Option<&QuadratureCounter> {
        self.counters.get(channel)
    }

    /// Edge callback for one encoder; unknown channels are ignored
    pub fn on_edge(&self, channel: usize, a: bool, b: bool) {
        if let Some(counter) = self.counters.get(channel) {
            counter.on_edge(a, b);
        }
    }

    /// Quantized position of one encoder, 0 for unknown channels
    pub fn sample(&self, channel: usize) -> i32 {
        self.counters.get(channel).map_or(0, QuadratureCounter::sample)
    }

    /// Quantized positions of every encoder
    pub fn sample_all(&self) -> [i32; N] {
        core::array::from_fn(|i| self.counters[i].sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // One full cycle each way, starting and ending at rest (1,1)
    const FORWARD: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];
    const BACKWARD: [(bool, bool); 4] = [(true, false), (false, false), (false, true), (true, true)];

    fn turn(counter: &QuadratureCounter, seq: &[(bool, bool); 4], cycles: usize) {
        for _ in 0..cycles {
            for &(a, b) in seq {
                counter.on_edge(a, b);
            }
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(4), 2);
        assert_eq!(quantize(5), 2);
        assert_eq!(quantize(-5), -2);
        assert_eq!(quantize(-4), -2);
        assert_eq!(quantize(1), 0);
        assert_eq!(quantize(-1), 0);
        assert_eq!(quantize(0), 0);
    }

    #[test]
    fn test_full_cycle_moves_raw_by_two() {
        let counter = QuadratureCounter::new();
        turn(&counter, &FORWARD, 1);
        assert_eq!(counter.raw_count(), 2);
        assert_eq!(counter.sample(), 1);
    }

    #[test]
    fn test_directions_are_symmetric() {
        let cw = QuadratureCounter::new();
        let ccw = QuadratureCounter::new();
        turn(&cw, &FORWARD, 3);
        turn(&ccw, &BACKWARD, 3);
        assert_eq!(cw.sample(), 3);
        assert_eq!(ccw.sample(), -3);
    }

    #[test]
    fn test_half_cycle_latches_at_rest_state() {
        let counter = QuadratureCounter::new();
        counter.on_edge(false, true);
        assert_eq!(counter.raw_count(), 0);
        counter.on_edge(false, false);
        assert_eq!(counter.raw_count(), 1);
        assert_eq!(counter.sample(), 0);
    }

    #[test]
    fn test_bounce_does_not_drift() {
        let counter = QuadratureCounter::new();
        for _ in 0..10 {
            counter.on_edge(true, false);
            counter.on_edge(true, true);
        }
        assert_eq!(counter.raw_count(), 0);
    }

    #[test]
    fn test_invalid_jump_ignored() {
        let counter = QuadratureCounter::new();
        // 11 -> 00 skips a phase
        counter.on_edge(false, false);
        assert_eq!(counter.raw_count(), 0);
    }

    #[test]
    fn test_sampler_channels() {
        let sampler = EncoderSampler::<4>::new();
        if let Some(counter) = sampler.counter(2) {
            turn(counter, &FORWARD, 2);
        }
        sampler.on_edge(9, true, false);
        assert_eq!(sampler.sample_all(), [0, 0, 2, 0]);
        assert_eq!(sampler.sample(9), 0);
    }

    proptest! {
        #[test]
        fn prop_quantize_rounds_toward_zero(raw in -100_000i32..100_000) {
            let q = quantize(raw);
            let adjusted = if raw % 2 != 0 { raw - raw.signum() } else { raw };
            prop_assert_eq!(q, adjusted / 2);
            prop_assert!(q.abs() * 2 <= raw.abs());
        }

        #[test]
        fn prop_forward_then_back_returns_home(cycles in 0usize..50) {
            let counter = QuadratureCounter::new();
            turn(&counter, &FORWARD, cycles);
            turn(&counter, &BACKWARD, cycles);
            prop_assert_eq!(counter.sample(), 0);
        }
    }
}
