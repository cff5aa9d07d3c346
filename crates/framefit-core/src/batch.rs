//! Batch driver: one directory in, one PNG per input file out.
//!
//! Files are processed sequentially. Every per-file step returns a `Result`;
//! failures are logged, recorded in the summary and never stop the batch.
//! Only problems with the directories themselves abort a run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::{compose, CompositeError};
use crate::decode::{decode_image, read_orientation_code, read_source, DecodeError};
use crate::encode::{write_png, EncodeError};
use crate::fit::{fit_to_canvas, FitResult};
use crate::transform::{Transform, TransformError, TransformMode};

/// Extension given to every output file.
pub const OUTPUT_EXTENSION: &str = "png";

/// Errors that fail a single file.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The file name has no extension separator to strip.
    #[error("File name {0:?} has no extension")]
    MalformedFilename(String),

    /// An earlier entry in the same run already wrote this output file.
    #[error("Output {0} was already written by another file in this run")]
    OutputCollision(PathBuf),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The source directory is missing, not a directory, or unreadable.
    #[error("Cannot read source directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory cannot be created.
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options shared by every file in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Anchoring of orientation transforms.
    pub transform_mode: TransformMode,
}

/// What a successful file produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Raw EXIF orientation code (0 when absent).
    pub orientation: u32,
    /// Image size after orientation, before scaling.
    pub oriented_width: u32,
    pub oriented_height: u32,
    pub fit: FitResult,
    pub bytes_written: usize,
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// The result of one file, as collected by the driver.
#[derive(Debug)]
pub enum FileOutcome {
    Processed(ProcessedFile),
    Failed {
        source: PathBuf,
        error: ProcessError,
    },
}

/// Aggregated results of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of entries found in the source directory.
    pub total: usize,
    pub processed: Vec<ProcessedFile>,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    /// Fold a list of outcomes into a summary.
    pub fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Processed(file) => summary.processed.push(file),
                FileOutcome::Failed { source, error } => summary.failures.push(FileFailure {
                    source,
                    reason: error.to_string(),
                }),
            }
        }
        summary
    }

    pub fn processed_count(&self) -> usize {
        self.total - self.failures.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Capture the entries of `dir` once, sorted by path.
///
/// Not recursive. Subdirectories are listed too; they fail later when read.
/// Files created after this call are not part of the run.
pub fn snapshot_dir(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let unreadable = |source| BatchError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(unreadable)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;

    entries.sort();
    Ok(entries)
}

/// Output path for `source`: its name up to the last `.`, plus `.png`.
///
/// # Errors
///
/// Returns `ProcessError::MalformedFilename` when the name has no `.` or is
/// not valid UTF-8.
pub fn output_path_for(source: &Path, output_dir: &Path) -> Result<PathBuf, ProcessError> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = source
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit_once('.'))
        .map(|(stem, _)| stem)
        .ok_or(ProcessError::MalformedFilename(name))?;

    Ok(output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION)))
}

/// Run the full pipeline for one file and write the result to `output`.
pub fn process_file(
    source: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<ProcessedFile, ProcessError> {
    let bytes = read_source(source)?;
    let orientation = read_orientation_code(&bytes);
    let image = decode_image(&bytes)?;
    drop(bytes);

    let transform = Transform::resolve(
        orientation,
        image.width,
        image.height,
        options.transform_mode,
    )?;
    let oriented = transform.apply(&image);
    drop(image);

    let (oriented_width, oriented_height) = oriented.dimensions();
    let fit = fit_to_canvas(oriented_width, oriented_height);
    tracing::debug!(
        "{}: orientation {}, {}x{} -> {}x{} (scale {:.4})",
        source.display(),
        orientation,
        oriented_width,
        oriented_height,
        fit.scaled_width,
        fit.scaled_height,
        fit.scale
    );

    let canvas = compose(oriented, &fit)?;
    let bytes_written = write_png(canvas.as_image(), output)?;

    Ok(ProcessedFile {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        orientation,
        oriented_width,
        oriented_height,
        fit,
        bytes_written,
    })
}

/// Output paths written so far in one run.
#[derive(Debug, Default)]
struct ClaimedOutputs(HashSet<PathBuf>);

impl ClaimedOutputs {
    fn check(&self, output: PathBuf) -> Result<PathBuf, ProcessError> {
        if self.0.contains(&output) {
            Err(ProcessError::OutputCollision(output))
        } else {
            Ok(output)
        }
    }

    fn claim(&mut self, output: &Path) {
        self.0.insert(output.to_path_buf());
    }
}

fn process_entry(
    source: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    claimed: &mut ClaimedOutputs,
) -> FileOutcome {
    let result = output_path_for(source, output_dir)
        .and_then(|output| claimed.check(output))
        .and_then(|output| process_file(source, &output, options));

    match result {
        Ok(file) => {
            claimed.claim(&file.output);
            tracing::info!("Image scaling complete for {}", source.display());
            FileOutcome::Processed(file)
        }
        Err(error) => {
            tracing::warn!("Image scaling failed for {}: {}", source.display(), error);
            FileOutcome::Failed {
                source: source.to_path_buf(),
                error,
            }
        }
    }
}

/// Process every entry of `source_dir` into `output_dir`.
///
/// The output directory is created if it does not exist.
///
/// # Errors
///
/// Only directory-level problems are returned; per-file failures are part of
/// the summary.
pub fn run_batch(
    source_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary, BatchError> {
    let entries = snapshot_dir(source_dir)?;

    std::fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    tracing::info!("Preparing to process {} files", entries.len());

    let mut claimed = ClaimedOutputs::default();
    let outcomes = entries
        .iter()
        .map(|entry| process_entry(entry, output_dir, options, &mut claimed))
        .collect();
    let summary = BatchSummary::from_outcomes(outcomes);

    tracing::info!(
        "Processed {} of {} files",
        summary.processed_count(),
        summary.total
    );

    Ok(summary)
}
