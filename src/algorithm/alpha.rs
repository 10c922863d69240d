//! Per-sample opacity generation

use crate::algorithm::patterns::{MatchCount, PatternSet};
use crate::io::configuration::{ENTROPY_BITS_PER_BYTE, OPAQUE};
use crate::math::entropy::shannon;

/// Policy filling the alpha buffer before packing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AlphaMode {
    /// Fully opaque, written once on switch
    Constant,
    /// Painted by registered patterns; opaque when none are registered
    Pattern,
    /// Block-wise Shannon entropy of the underlying bytes
    Entropy,
}

/// Map an entropy value in bits per byte to an opacity
pub fn entropy_alpha(entropy: f64) -> u8 {
    let scaled = (255.0 * entropy / ENTROPY_BITS_PER_BYTE).round();
    scaled.clamp(0.0, 255.0) as u8
}

/// Set every sample fully opaque
pub fn fill_constant(alpha: &mut [u8]) {
    alpha.fill(OPAQUE);
}

/// Split the window into blocks of `block` samples and paint each block with
/// the opacity of its bytes' entropy
///
/// Each sample spans `footprint` raw bytes, so the entropy of block `k`
/// covers raw bytes `[k * block * footprint, (k + 1) * block * footprint)`.
pub fn fill_block_entropy(alpha: &mut [u8], window: &[u8], footprint: usize, block: usize) {
    let block = block.max(1);
    let footprint = footprint.max(1);

    for (index, span) in alpha.chunks_mut(block).enumerate() {
        let start = index * block * footprint;
        let end = start + span.len() * footprint;
        let value = window
            .get(start..end.min(window.len()))
            .map_or(OPAQUE, |raw| entropy_alpha(shannon(raw)));
        span.fill(value);
    }
}

/// Populate `alpha` for one frame under `mode`
///
/// Returns the pattern match counts produced by a pattern pass; other modes
/// report none. The constant policy leaves the buffer as written at switch time.
pub fn generate(
    mode: AlphaMode,
    alpha: &mut [u8],
    window: &[u8],
    footprint: usize,
    block: usize,
    patterns: &mut PatternSet,
) -> Vec<MatchCount> {
    match mode {
        AlphaMode::Constant => Vec::new(),
        AlphaMode::Entropy => {
            fill_block_entropy(alpha, window, footprint, block);
            Vec::new()
        }
        AlphaMode::Pattern => {
            if patterns.is_empty() {
                fill_constant(alpha);
                Vec::new()
            } else {
                patterns.scan(window, footprint, alpha)
            }
        }
    }
}
