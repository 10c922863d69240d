//! Shannon entropy estimators over byte windows

use crate::analysis::histogram::{BUCKETS, Histogram};
use crate::io::configuration::ENTROPY_BITS_PER_BYTE;

/// Shannon entropy of `buffer` in bits per byte, using a histogram built over it
///
/// Accumulated as the mean self-information of every position,
/// `-(1/n) * sum(log2(p[buffer[i]]))` with `p[b] = counts[b] / n`, which equals
/// the per-symbol Shannon sum without visiting the 256 buckets. Positions
/// whose bucket is empty contribute nothing, so a histogram that lags behind
/// the buffer cannot produce NaN.
///
/// Returns 0 for an empty buffer and at most 8 otherwise.
pub fn shannon_with(buffer: &[u8], counts: &[u32; BUCKETS]) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }

    let len = buffer.len() as f64;
    let mut information = 0.0;
    for &byte in buffer {
        let count = counts.get(usize::from(byte)).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        let probability = f64::from(count) / len;
        information -= probability.log2();
    }

    (information / len).clamp(0.0, ENTROPY_BITS_PER_BYTE)
}

/// Shannon entropy of `buffer` computed from scratch
///
/// Builds a disposable histogram, so it is suitable for arbitrary sub-ranges
/// such as per-block alpha computation.
pub fn shannon(buffer: &[u8]) -> f64 {
    let histogram = Histogram::from_bytes(buffer);
    shannon_with(buffer, histogram.counts())
}

/// Scale an entropy value in bits per byte to the unit interval
pub fn normalized(entropy: f64) -> f64 {
    (entropy / ENTROPY_BITS_PER_BYTE).clamp(0.0, 1.0)
}
