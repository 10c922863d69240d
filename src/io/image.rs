//! PNG and animated GIF export of rendered frames

use crate::io::error::{ChannelError, Result};
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ChannelError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Save one frame as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn save_png(frame: &RgbaImage, path: &Path) -> Result<()> {
    ensure_parent(path)?;

    frame.save(path).map_err(|e| ChannelError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Encode a frame sequence as an animated GIF
///
/// # Errors
///
/// Returns an error if:
/// - No frames were supplied
/// - File system operations fail
/// - GIF encoding fails
pub fn export_gif(frames: &[RgbaImage], path: &Path, frame_delay_ms: u32) -> Result<()> {
    if frames.is_empty() {
        return Err(ChannelError::InvalidParameter {
            parameter: "frames",
            value: "0".to_string(),
            reason: "no frames captured for animation".to_string(),
        });
    }

    ensure_parent(path)?;

    let file = std::fs::File::create(path).map_err(|e| ChannelError::FileSystem {
        path: path.to_path_buf(),
        operation: "create file",
        source: e,
    })?;

    let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
    let animation = frames
        .iter()
        .map(|image| Frame::from_parts(image.clone(), 0, 0, delay));

    let mut encoder = image::codecs::gif::GifEncoder::new(file);
    encoder
        .encode_frames(animation)
        .map_err(|e| ChannelError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
