//! The `greyroom run` command: ingest, filter and export without a prompt.

use std::path::PathBuf;

use clap::Args;
use greyroom_core::config::expand;
use greyroom_core::{Config, OutputFormat, OutputWriter, Workspace};

use super::progress::IngestProgress;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image file or folder to load
    pub input: PathBuf,

    /// Blend toward grayscale at this intensity (0-100) before exporting
    #[arg(short, long, value_name = "N")]
    pub grayscale: Option<f64>,

    /// Only filter and export the first image with this file name
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,

    /// Export directory [default: paths.output_dir from config]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Do not clear exported images from memory
    #[arg(long)]
    pub keep: bool,

    /// Also write previews to paths.preview_dir before exporting
    #[arg(long)]
    pub preview: bool,

    /// Print each report as one JSON line instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute the run command.
pub fn execute(args: RunArgs, config: Config) -> anyhow::Result<()> {
    if let Some(intensity) = args.grayscale {
        if !(0.0..=100.0).contains(&intensity) {
            anyhow::bail!("--grayscale must be between 0 and 100, got {intensity}");
        }
    }

    let dest = match &args.output {
        Some(dir) => expand(dir),
        None => config.output_dir(),
    };
    let clear = config.export.clear_after_export && !args.keep;
    let format = if args.json {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Text
    };
    let mut out = OutputWriter::new(std::io::stdout().lock(), format, false);
    let mut workspace = Workspace::new(config);
    let target = args.target.as_deref();

    let mut progress = IngestProgress::new();
    let ingested =
        workspace.add_input_with_progress(&expand(&args.input), |e| progress.on_event(e));
    progress.finish();
    out.write(&ingested?)?;

    if let Some(intensity) = args.grayscale {
        let count = workspace.apply_grayscale(target, intensity)?;
        tracing::debug!("Filtered {} image(s) at {}%", count, intensity);
    }

    if args.preview {
        out.write(&workspace.save_preview(target)?)?;
    }

    let report = workspace.export_output(&dest, clear, target)?;
    out.write(&report)?;
    out.flush()?;

    if !report.failed.is_empty() {
        tracing::warn!(
            "{} image(s) could not be exported and were kept in memory",
            report.failed.len()
        );
    }

    Ok(())
}
