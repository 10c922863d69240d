//! Byte-stream to pixel transcoding engine for visual inspection of binary data
//!
//! Raw bytes are collected into a square window, either block by block or as a
//! sliding window, and every completed window is rendered into a raster using a
//! configurable geometry (row-major, coordinate tuples, or a Hilbert curve), a
//! configurable sample packing, and an opacity channel driven by local Shannon
//! entropy or by byte-pattern matches.

#![forbid(unsafe_code)]

/// Window clocking, packing, alpha generation, pattern matching and the channel façade
pub mod algorithm;
/// Byte frequency analysis
pub mod analysis;
/// Control protocol, notifications, configuration, export and error handling
pub mod io;
/// Entropy estimation
pub mod math;
/// Coordinate mapping, space-filling curves and the output raster
pub mod spatial;

pub use algorithm::channel::{Channel, ChannelConfig};
pub use io::error::{ChannelError, Result};
