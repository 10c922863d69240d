//! Sample to pixel packing codec

use crate::analysis::histogram::BUCKETS;
use crate::spatial::mapping::MappingMode;

/// Policy converting consecutive raw bytes (and alpha) into one pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PackingMode {
    /// Four bytes as red, green, blue, alpha
    Tight,
    /// Three bytes as red, green, blue with alpha from the alpha buffer
    TightNoAlpha,
    /// One byte as grey intensity with alpha from the alpha buffer
    Intensity,
    /// One byte looked up in the normalized histogram as grey intensity
    HistogramIntensity,
}

impl PackingMode {
    /// Index reported in stream-info notifications
    pub const fn index(self) -> u8 {
        match self {
            Self::Tight => 0,
            Self::TightNoAlpha => 1,
            Self::Intensity => 2,
            Self::HistogramIntensity => 3,
        }
    }

    /// Bytes one pixel consumes before any mapping overhead
    pub const fn base_footprint(self) -> usize {
        match self {
            Self::Tight => 4,
            Self::TightNoAlpha => 3,
            Self::Intensity | Self::HistogramIntensity => 1,
        }
    }

    /// Bytes one sample consumes under `mapping`
    pub const fn footprint(self, mapping: MappingMode) -> usize {
        self.base_footprint() + mapping.extra_bytes()
    }

    /// Test if the pixel alpha comes from the alpha buffer
    pub const fn uses_alpha(self) -> bool {
        !matches!(self, Self::Tight)
    }
}

/// Pack one sample into an RGBA pixel
///
/// `bytes` starts after any mapping prefix. `intensity` is only consulted for
/// [`PackingMode::HistogramIntensity`]. Returns `None` if `bytes` is shorter
/// than the packing's base footprint.
pub fn pack_pixel(
    mode: PackingMode,
    bytes: &[u8],
    alpha: u8,
    intensity: &[u8; BUCKETS],
) -> Option<[u8; 4]> {
    match mode {
        PackingMode::Tight => {
            let rgba = bytes.get(..4)?;
            Some([*rgba.first()?, *rgba.get(1)?, *rgba.get(2)?, *rgba.get(3)?])
        }
        PackingMode::TightNoAlpha => {
            let rgb = bytes.get(..3)?;
            Some([*rgb.first()?, *rgb.get(1)?, *rgb.get(2)?, alpha])
        }
        PackingMode::Intensity => {
            let v = *bytes.first()?;
            Some([v, v, v, alpha])
        }
        PackingMode::HistogramIntensity => {
            let h = *intensity.get(usize::from(*bytes.first()?))?;
            Some([h, h, h, alpha])
        }
    }
}
