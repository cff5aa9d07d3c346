use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use framefit_core::{run_batch, BatchOptions, BatchSummary, TransformMode};

#[derive(Parser, Debug)]
#[command(name = "framefit")]
#[command(about = "Frame every photo in a directory onto a 1920x1080 canvas with a drop shadow")]
#[command(version)]
struct Cli {
    /// Directory with the source photos (not searched recursively)
    source_dir: PathBuf,

    /// Directory for the framed PNG files (created if missing)
    output_dir: PathBuf,

    /// Placement of rotated/flipped images: corrected, or legacy (width-anchored)
    #[arg(long, value_enum, default_value_t = OrientationMode::Corrected)]
    orientation_mode: OrientationMode,

    /// Write a JSON summary of the run to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Exit with status 1 when any file fails
    #[arg(long)]
    fail_on_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrientationMode {
    Corrected,
    Legacy,
}

impl From<OrientationMode> for TransformMode {
    fn from(mode: OrientationMode) -> Self {
        match mode {
            OrientationMode::Corrected => TransformMode::Corrected,
            OrientationMode::Legacy => TransformMode::Legacy,
        }
    }
}

/// Initialize tracing, honouring RUST_LOG and defaulting to info.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn write_report(path: &Path, summary: &BatchSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Per-file failures only change the exit status when asked to.
fn should_fail(summary: &BatchSummary, fail_on_error: bool) -> bool {
    fail_on_error && !summary.is_success()
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let options = BatchOptions {
        transform_mode: cli.orientation_mode.into(),
    };

    let summary = run_batch(&cli.source_dir, &cli.output_dir, &options)
        .with_context(|| format!("Batch over {} aborted", cli.source_dir.display()))?;

    for failure in &summary.failures {
        tracing::warn!("  {}: {}", failure.source.display(), failure.reason);
    }

    if let Some(ref path) = cli.report {
        write_report(path, &summary)?;
    }

    if should_fail(&summary, cli.fail_on_error) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
