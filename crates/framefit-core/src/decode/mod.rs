//! Image decoding for framefit.
//!
//! This module provides functionality for:
//! - Reading source files from disk
//! - Decoding any enabled format (JPEG, PNG, BMP, GIF, TIFF) into RGBA8
//! - Best-effort EXIF orientation lookup
//!
//! Orientation is only read here, never applied: the resolver in
//! [`crate::transform`] turns the code into a transform.

mod metadata;
mod source;
mod types;

pub use metadata::{read_orientation, read_orientation_code, NO_ORIENTATION};
pub use source::{decode_image, read_source};
pub use types::{DecodeError, Orientation, SourceImage};
