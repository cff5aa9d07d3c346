//! Orientation correction.
//!
//! This module turns an EXIF orientation code into an affine transform and
//! applies it to a decoded image before any scaling happens.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y points down
//! - Quarter turns are clockwise on screen
//! - Pixel (x, y) covers the continuous square `[x, x+1) x [y, y+1)`

mod affine;
mod orientation;

pub use orientation::{apply_orientation, Transform, TransformError, TransformMode};
