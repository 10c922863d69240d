//! Spatial mapping of window offsets onto the raster
//!
//! This module contains spatial-related functionality including:
//! - Hilbert curve table construction
//! - Mapping mode resolution
//! - The output raster

/// Hilbert curve lookup tables
pub mod curve;
/// Mapping modes and coordinate resolution
pub mod mapping;
/// Square RGBA output raster
pub mod raster;

pub use raster::Raster;
