//! Offset to coordinate mapping policies

use crate::io::configuration::TUPLE_EXTRA_BYTES;
use crate::io::error::Result;
use crate::spatial::curve::CurveTable;

/// Geometric policy converting a sample's window offset to a raster coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MappingMode {
    /// Row-major wrap: `x = offset mod side`, `y = offset div side`
    Raster,
    /// First two sample bytes are scaled into `x` and `y`
    Tuple,
    /// Hilbert curve order (requires a power-of-two side)
    Curve,
}

impl MappingMode {
    /// Index reported in stream-info notifications
    pub const fn index(self) -> u8 {
        match self {
            Self::Raster => 0,
            Self::Tuple => 1,
            Self::Curve => 2,
        }
    }

    /// Bytes each sample spends on coordinates
    pub const fn extra_bytes(self) -> usize {
        match self {
            Self::Raster | Self::Curve => 0,
            Self::Tuple => TUPLE_EXTRA_BYTES,
        }
    }

    /// Test if the mapping leaves pixels uncovered and needs a cleared canvas
    pub const fn is_sparse(self) -> bool {
        matches!(self, Self::Tuple)
    }
}

/// Active mapping with its derived state
///
/// Holds the curve table only for [`MappingMode::Curve`] and the tuple
/// coordinate span for every mode, both rebuilt whenever the side changes.
#[derive(Clone, Debug)]
pub struct CoordinateMap {
    mode: MappingMode,
    side: usize,
    span: usize,
    curve: Option<CurveTable>,
}

impl CoordinateMap {
    /// Build the mapping for a `side` x `side` window
    ///
    /// # Errors
    ///
    /// Returns an error if the curve table cannot be built for `side`
    pub fn build(mode: MappingMode, side: usize) -> Result<Self> {
        let curve = match mode {
            MappingMode::Curve => Some(CurveTable::build(side)?),
            MappingMode::Raster | MappingMode::Tuple => None,
        };

        Ok(Self {
            mode,
            side,
            span: side.saturating_sub(1),
            curve,
        })
    }

    /// Active mapping mode
    pub const fn mode(&self) -> MappingMode {
        self.mode
    }

    /// Window side the mapping was built for
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Coordinate scale factors used by tuple mapping, `(side - 1) / 255` on both axes
    pub fn scale(&self) -> (f64, f64) {
        let factor = self.span as f64 / 255.0;
        (factor, factor)
    }

    /// Curve table, present only for curve mapping
    pub const fn curve(&self) -> Option<&CurveTable> {
        self.curve.as_ref()
    }

    /// Resolve the coordinate of the sample at window offset `offset`
    ///
    /// `sample` is the sample's full byte footprint; tuple mapping reads its
    /// first two bytes. Returns `None` when the offset or sample cannot be
    /// placed on the grid.
    pub fn locate(&self, offset: usize, sample: &[u8]) -> Option<(usize, usize)> {
        if self.side == 0 {
            return None;
        }

        match self.mode {
            MappingMode::Raster => {
                let point = (offset % self.side, offset / self.side);
                (point.1 < self.side).then_some(point)
            }
            MappingMode::Tuple => {
                let x = scale_coordinate(*sample.first()?, self.span);
                let y = scale_coordinate(*sample.get(1)?, self.span);
                Some((x, y))
            }
            MappingMode::Curve => self.curve.as_ref()?.point(offset),
        }
    }
}

// Truncates toward zero; only byte 255 reaches the last row or column
fn scale_coordinate(byte: u8, span: usize) -> usize {
    (usize::from(byte).saturating_mul(span) / 255).min(span)
}
