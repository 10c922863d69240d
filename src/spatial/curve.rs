//! Hilbert curve lookup table construction

use crate::io::configuration::MAX_WINDOW_SIDE;
use crate::io::error::{Result, invalid_parameter, try_filled};
use bitvec::prelude::*;
use ndarray::Array2;

/// Convert a linear curve index to `(x, y)` on a `side` x `side` grid
///
/// Walks the index two bits at a time from the least significant end. Each
/// pair selects a quadrant of the current power-of-two sub-square; the
/// accumulated point is rotated or reflected into that quadrant's frame and
/// then offset by the quadrant origin.
///
/// `side` must be a power of two for the curve to visit every cell exactly once.
pub fn index_to_point(side: usize, index: usize) -> (usize, usize) {
    let mut x = 0;
    let mut y = 0;
    let mut t = index;
    let mut s = 1;

    while s < side {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }

    (x, y)
}

// x and y are below s whenever this runs, so the reflection cannot underflow
fn rotate(s: usize, x: &mut usize, y: &mut usize, rx: usize, ry: usize) {
    if ry == 0 {
        if rx == 1 {
            *x = s - 1 - *x;
            *y = s - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}

/// Precomputed offset to coordinate table for curve mapping
///
/// Row `i` holds the `(x, y)` of window offset `i`.
#[derive(Clone, Debug)]
pub struct CurveTable {
    side: usize,
    coords: Array2<u16>,
}

impl CurveTable {
    /// Build the table for a `side` x `side` window
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `side` is zero, not a power of two, or above [`MAX_WINDOW_SIDE`]
    /// - The table cannot be allocated
    pub fn build(side: usize) -> Result<Self> {
        if side == 0 || !side.is_power_of_two() {
            return Err(invalid_parameter(
                "side",
                &side,
                &"curve mapping requires a power-of-two side",
            ));
        }
        if side > MAX_WINDOW_SIDE {
            return Err(invalid_parameter(
                "side",
                &side,
                &format!("exceeds maximum window side {MAX_WINDOW_SIDE}"),
            ));
        }

        let cells = side * side;
        let mut flat = try_filled(cells * 2, 0u16, "curve table")?;
        for (index, pair) in flat.chunks_exact_mut(2).enumerate() {
            let (x, y) = index_to_point(side, index);
            // Bounded by MAX_WINDOW_SIDE
            let point = [x as u16, y as u16];
            pair.copy_from_slice(&point);
        }

        let coords = Array2::from_shape_vec((cells, 2), flat).map_err(|e| {
            invalid_parameter("side", &side, &format!("curve table shape: {e}"))
        })?;

        Ok(Self { side, coords })
    }

    /// Window side the table was built for
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Number of entries (side squared)
    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    /// Test if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate of window offset `offset`
    pub fn point(&self, offset: usize) -> Option<(usize, usize)> {
        let x = self.coords.get([offset, 0])?;
        let y = self.coords.get([offset, 1])?;
        Some((usize::from(*x), usize::from(*y)))
    }

    /// Check that every grid cell appears exactly once
    pub fn is_bijection(&self) -> bool {
        if self.len() != self.side * self.side {
            return false;
        }

        let mut visited = bitvec![0; self.len()];
        for offset in 0..self.len() {
            let Some((x, y)) = self.point(offset) else {
                return false;
            };
            if x >= self.side || y >= self.side {
                return false;
            }
            let cell = y * self.side + x;
            if visited.get(cell).as_deref() == Some(&true) {
                return false;
            }
            visited.set(cell, true);
        }

        visited.all()
    }
}
