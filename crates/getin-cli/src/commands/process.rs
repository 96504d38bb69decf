//! Process command - convert a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use getin_core::Importer;

use super::{OutputFormat, format_normalized, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Process the file even if its name does not look like a statement export
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let importer = Importer::from_config(&config)?;
    if !importer.identify(&args.input) && !args.force {
        anyhow::bail!(
            "{} does not look like a Getin Bank statement (expected a name matching {}). Use --force to process it anyway.",
            args.input.display(),
            config.matcher.filename_pattern
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting transactions...");

    let result = importer.extract_detailed(&args.input);
    pb.finish_and_clear();
    let normalized = result?;

    if !normalized.status.is_clean() {
        eprintln!(
            "{} Footer cleaning: {}",
            style("⚠").yellow(),
            normalized.status
        );
    }
    for skipped in &normalized.skipped {
        eprintln!(
            "{} Skipped row {}: {}",
            style("⚠").yellow(),
            skipped.index,
            skipped.error
        );
    }

    let output = format_normalized(&normalized, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            normalized.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
