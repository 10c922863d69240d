//! Engine constants and runtime configuration defaults

/// Window side used when none is requested
pub const DEFAULT_WINDOW_SIDE: usize = 256;

// Keeps curve coordinates inside u16 and the raster inside u32 dimensions
/// Maximum accepted window side
pub const MAX_WINDOW_SIDE: usize = 4096;

/// Fully opaque alpha value
pub const OPAQUE: u8 = 0xFF;

/// Opacity painted by patterns registered without explicit options
pub const DEFAULT_PATTERN_ALPHA: u8 = 0x40;

/// Upper bound of Shannon entropy over byte symbols, in bits
pub const ENTROPY_BITS_PER_BYTE: f64 = 8.0;

/// Extra bytes per sample consumed by coordinate-tuple mapping
pub const TUPLE_EXTRA_BYTES: usize = 2;

/// Background pixel written before each sparse (coordinate-tuple) frame
pub const BACKGROUND: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

// File sensor defaults
/// Bytes read from the input per ingest call
pub const DEFAULT_CHUNK_SIZE: usize = 4096;
/// Frames exported before the sensor stops reading
pub const DEFAULT_MAX_FRAMES: usize = 64;

// Output settings
/// Infix added to per-frame PNG filenames
pub const FRAME_SUFFIX: &str = "_frame";
/// Suffix added to animated GIF filenames
pub const ANIMATION_SUFFIX: &str = "_frames.gif";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 100;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
