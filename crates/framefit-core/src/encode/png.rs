//! PNG encoding for output canvases.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoded file could not be written
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode an RGBA image to PNG bytes.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for empty images and
/// `EncodeError::EncodingFailed` if the encoder rejects the data.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Encode an RGBA image and write it to `path`, replacing any existing file.
///
/// Returns the number of bytes written.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<usize, EncodeError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}
