//! Inbound control command protocol

use crate::algorithm::alpha::AlphaMode;
use crate::algorithm::packing::PackingMode;
use crate::algorithm::window::ClockMode;
use crate::io::error::{ChannelError, Result};
use crate::spatial::mapping::MappingMode;

/// Mode switch carried by one inbound integer selector
///
/// Selectors: 0/1 clock block/slide; 10/11/12 mapping raster/tuple/curve;
/// 20/21/22/23 packing intensity/histogram-intensity/tight/tight-no-alpha;
/// 30/31/32 alpha constant/pattern/entropy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch clock mode
    Clock(ClockMode),
    /// Switch mapping mode
    Mapping(MappingMode),
    /// Switch packing mode
    Packing(PackingMode),
    /// Switch alpha mode
    Alpha(AlphaMode),
}

impl Command {
    /// Decode a selector
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UnknownCommand`] for unrecognized selectors
    pub fn from_selector(selector: i32) -> Result<Self> {
        let command = match selector {
            0 => Self::Clock(ClockMode::Block),
            1 => Self::Clock(ClockMode::Slide),
            10 => Self::Mapping(MappingMode::Raster),
            11 => Self::Mapping(MappingMode::Tuple),
            12 => Self::Mapping(MappingMode::Curve),
            20 => Self::Packing(PackingMode::Intensity),
            21 => Self::Packing(PackingMode::HistogramIntensity),
            22 => Self::Packing(PackingMode::Tight),
            23 => Self::Packing(PackingMode::TightNoAlpha),
            30 => Self::Alpha(AlphaMode::Constant),
            31 => Self::Alpha(AlphaMode::Pattern),
            32 => Self::Alpha(AlphaMode::Entropy),
            _ => return Err(ChannelError::UnknownCommand { selector }),
        };
        Ok(command)
    }

    /// Selector encoding this command
    pub const fn selector(self) -> i32 {
        match self {
            Self::Clock(ClockMode::Block) => 0,
            Self::Clock(ClockMode::Slide) => 1,
            Self::Mapping(MappingMode::Raster) => 10,
            Self::Mapping(MappingMode::Tuple) => 11,
            Self::Mapping(MappingMode::Curve) => 12,
            Self::Packing(PackingMode::Intensity) => 20,
            Self::Packing(PackingMode::HistogramIntensity) => 21,
            Self::Packing(PackingMode::Tight) => 22,
            Self::Packing(PackingMode::TightNoAlpha) => 23,
            Self::Alpha(AlphaMode::Constant) => 30,
            Self::Alpha(AlphaMode::Pattern) => 31,
            Self::Alpha(AlphaMode::Entropy) => 32,
        }
    }
}

impl TryFrom<i32> for Command {
    type Error = ChannelError;

    fn try_from(selector: i32) -> Result<Self> {
        Self::from_selector(selector)
    }
}
