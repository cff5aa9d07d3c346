//! Best-effort EXIF orientation lookup.

use std::io::Cursor;

use exif::{In, Reader, Tag};

use super::Orientation;

/// Orientation code reported when no usable tag is present.
pub const NO_ORIENTATION: u32 = 0;

/// Extract the raw EXIF orientation code from image file bytes.
///
/// Returns [`NO_ORIENTATION`] if the container has no EXIF block, the block
/// cannot be parsed, or the primary IFD has no Orientation tag. This never
/// fails: a missing tag only means the image is treated as upright.
pub fn read_orientation_code(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!("no readable EXIF metadata: {}", e);
            return NO_ORIENTATION;
        }
    };

    match exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
    {
        Some(code) => code,
        None => {
            tracing::debug!("EXIF metadata has no orientation tag");
            NO_ORIENTATION
        }
    }
}

/// Extract the EXIF orientation as a typed value.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    Orientation::from(read_orientation_code(bytes))
}
