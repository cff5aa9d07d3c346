//! Image encoding for framefit.
//!
//! This module provides functionality for:
//! - Encoding the finished canvas as RGBA PNG
//! - Writing the encoded bytes to the output path
//!
//! PNG encoding is lossless and deterministic, so re-running a batch on the
//! same inputs reproduces the same files byte for byte.

mod png;

pub use png::{encode_png, write_png, EncodeError};
