//! Change detection for polled samples
//!
//! The bus requester keeps the last sample it saw per channel and only
//! reports channels whose fresh sample differs.

/// Last-seen cache for `N` channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDiffer<const N: usize> {
    cache: [i32; N],
}

impl<const N: usize> Default for BusDiffer<N> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<const N: usize> BusDiffer<N> {
    /// Cache with every channel at `initial`
    pub const fn new(initial: i32) -> Self {
        Self {
            cache: [initial; N],
        }
    }

    /// Cache seeded with explicit values
    pub const fn with_cache(cache: [i32; N]) -> Self {
        Self { cache }
    }

    /// Compare a fresh sample against the cache
    ///
    /// Returns the cached value after the comparison and whether it changed.
    /// Channels past `N` are never reported as changed.
    pub fn diff(&mut self, channel: usize, value: i32) -> (i32, bool) {
        match self.cache.get_mut(channel) {
            Some(cached) if *cached != value => {
                *cached = value;
                (value, true)
            }
            Some(cached) => (*cached, false),
            None => (value, false),
        }
    }

    /// Cached value for a channel
    pub fn cached(&self, channel: usize) -> Option<i32> {
        self.cache.get(channel).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_sample() {
        let mut differ = BusDiffer::<4>::with_cache([10, 0, 0, 0]);
        assert_eq!(differ.diff(0, 10), (10, false));
    }

    #[test]
    fn test_change_reported_once() {
        let mut differ = BusDiffer::<4>::with_cache([10, 0, 0, 0]);
        assert_eq!(differ.diff(0, 11), (11, true));
        assert_eq!(differ.diff(0, 11), (11, false));
        assert_eq!(differ.cached(0), Some(11));
    }

    #[test]
    fn test_channels_independent() {
        let mut differ = BusDiffer::<2>::new(0);
        assert!(differ.diff(1, 3).1);
        assert_eq!(differ.cached(0), Some(0));
    }

    #[test]
    fn test_out_of_range_channel() {
        let mut differ = BusDiffer::<2>::new(0);
        assert_eq!(differ.diff(5, 9), (9, false));
        assert_eq!(differ.cached(5), None);
    }
}
