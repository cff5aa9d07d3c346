//! framefit core - photo framing pipeline
//!
//! This crate takes photos of any size and orientation and renders each one
//! onto a fixed 1920x1080 transparent canvas: upright according to its EXIF
//! orientation, scaled to 85% of the canvas along its limiting axis, centered,
//! with a one-pixel drop shadow.
//!
//! # Pipeline
//!
//! 1. [`decode`] reads the file, looks up the orientation code and decodes
//! 2. [`transform`] resolves the orientation into a transform and applies it
//! 3. [`fit`] computes scale and placement
//! 4. [`composite`] draws shadow and image onto the canvas
//! 5. [`encode`] writes the canvas as PNG
//!
//! [`batch`] drives the pipeline over a directory, one file at a time.

pub mod batch;
pub mod composite;
pub mod decode;
pub mod encode;
pub mod fit;
pub mod transform;

pub use batch::{
    output_path_for, process_file, run_batch, snapshot_dir, BatchError, BatchOptions,
    BatchSummary, FileFailure, FileOutcome, ProcessError, ProcessedFile,
};
pub use composite::{compose, Canvas, CompositeError};
pub use decode::{DecodeError, Orientation, SourceImage};
pub use encode::EncodeError;
pub use fit::{fit_to_canvas, FitResult, CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN_FACTOR};
pub use transform::{apply_orientation, Transform, TransformError, TransformMode};
