//! Square RGBA output raster

use crate::io::error::{Result, invalid_parameter, try_filled};
use image::{Rgba, RgbaImage};

/// Output raster of `side` x `side` RGBA pixels
///
/// Owned by the channel and lent read-only to the sink on every flush.
#[derive(Clone, Debug)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Allocate a raster filled with `fill`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `side` does not fit the image dimensions
    /// - The pixel storage cannot be allocated
    pub fn new(side: usize, fill: [u8; 4]) -> Result<Self> {
        let dimension = u32::try_from(side)
            .map_err(|_e| invalid_parameter("side", &side, &"too large for raster"))?;
        let cells = side
            .checked_mul(side)
            .ok_or_else(|| invalid_parameter("side", &side, &"raster size overflows"))?;

        let mut storage = try_filled(cells * 4, 0u8, "raster")?;
        for pixel in storage.chunks_exact_mut(4) {
            pixel.copy_from_slice(&fill);
        }

        let image = RgbaImage::from_raw(dimension, dimension, storage)
            .ok_or_else(|| invalid_parameter("side", &side, &"raster storage mismatch"))?;
        Ok(Self { image })
    }

    /// Side length in pixels
    pub fn side(&self) -> usize {
        self.image.width() as usize
    }

    /// Write one pixel, ignoring coordinates outside the raster
    pub fn put(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if let Some(target) = self.image.get_pixel_mut_checked(x, y) {
            *target = Rgba(pixel);
        }
    }

    /// Read one pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Overwrite every pixel with `pixel`
    pub fn clear(&mut self, pixel: [u8; 4]) {
        for target in self.image.pixels_mut() {
            *target = Rgba(pixel);
        }
    }

    /// Borrow the underlying image
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }
}
