//! Byte frequency table over the current window

/// Number of buckets, one per byte value
pub const BUCKETS: usize = 256;

/// 256-bucket byte frequency table
///
/// Used in three phases that are never interleaved: counts are accumulated
/// (incrementally or by a full rebuild), optionally transformed into a
/// normalized intensity lookup, and then sampled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; BUCKETS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a histogram with every bucket empty
    pub const fn new() -> Self {
        Self {
            counts: [0; BUCKETS],
        }
    }

    /// Build a histogram counting every byte of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.absorb_all(bytes);
        histogram
    }

    /// Empty every bucket
    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    /// Count one byte
    pub fn absorb(&mut self, byte: u8) {
        if let Some(count) = self.counts.get_mut(usize::from(byte)) {
            *count = count.saturating_add(1);
        }
    }

    /// Count every byte of `bytes`
    pub fn absorb_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.absorb(byte);
        }
    }

    /// Replace the counts with those of `window`
    pub fn rebuild(&mut self, window: &[u8]) {
        self.reset();
        self.absorb_all(window);
    }

    /// Raw bucket counts indexed by byte value
    pub const fn counts(&self) -> &[u32; BUCKETS] {
        &self.counts
    }

    /// Count for a single byte value
    pub fn count(&self, byte: u8) -> u32 {
        self.counts.get(usize::from(byte)).copied().unwrap_or(0)
    }

    /// Sum of all buckets
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Rescale every bucket in place to `round(255 * bucket / total)`
    ///
    /// A visual heuristic mapping frequency to intensity, not a probability.
    /// An empty histogram is left untouched.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total == 0 {
            return;
        }

        let total = total as f64;
        for count in &mut self.counts {
            *count = (255.0 * f64::from(*count) / total).round() as u32;
        }
    }

    /// Normalized copy of the counts as an intensity lookup table
    ///
    /// The counts themselves are left intact.
    pub fn intensity_lut(&self) -> [u8; BUCKETS] {
        let mut normalized = self.clone();
        normalized.normalize();

        let mut lut = [0u8; BUCKETS];
        for (entry, &count) in lut.iter_mut().zip(normalized.counts.iter()) {
            *entry = u8::try_from(count).unwrap_or(u8::MAX);
        }
        lut
    }
}
