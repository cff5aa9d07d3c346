//! Reading and decoding source images.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use super::{DecodeError, SourceImage};

/// Read a source file into memory.
///
/// The bytes are shared between the metadata reader and the decoder so each
/// file is read from disk exactly once.
pub fn read_source(path: &Path) -> Result<Vec<u8>, DecodeError> {
    Ok(std::fs::read(path)?)
}

/// Decode image bytes of any enabled format into RGBA8.
///
/// The format is sniffed from the content, not the file name.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the format is unknown or the data
/// is truncated, and `DecodeError::EmptyImage` for zero-sized images.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let image = SourceImage::from_rgba_image(img.into_rgba8());
    if image.is_empty() {
        return Err(DecodeError::EmptyImage {
            width: image.width,
            height: image.height,
        });
    }

    Ok(image)
}
