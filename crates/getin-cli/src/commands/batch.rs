//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use getin_core::models::config::GetinConfig;
use getin_core::{Importer, Normalized};

use super::{OutputFormat, format_normalized, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of statement files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Include PDFs whose names do not look like statement exports
    #[arg(long)]
    force: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    normalized: Option<Normalized>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let importer = Importer::from_config(&config)?;

    let pdfs: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    let (files, ignored): (Vec<PathBuf>, Vec<PathBuf>) = pdfs
        .into_iter()
        .partition(|p| args.force || importer.identify(p));
    for path in &ignored {
        debug!("Ignoring {}: not a statement file name", path.display());
    }

    if files.is_empty() {
        anyhow::bail!("No matching statement files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} statements to process",
        style("ℹ").blue(),
        files.len()
    );
    if !ignored.is_empty() {
        println!(
            "{} Ignored {} PDFs with non-statement names (use --force to include them)",
            style("ℹ").blue(),
            ignored.len()
        );
    }

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // One statement at a time; a failure never stops the run
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = importer.extract_detailed(&path);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(normalized) => results.push(ProcessResult {
                path,
                normalized: Some(normalized),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                results.push(ProcessResult {
                    path,
                    normalized: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                });
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &results, args.format, &config)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let transactions: usize = results
        .iter()
        .filter_map(|r| r.normalized.as_ref())
        .map(Normalized::len)
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} transactions",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red(),
        transactions
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_outputs(
    output_dir: &Path,
    results: &[ProcessResult],
    format: OutputFormat,
    config: &GetinConfig,
) -> anyhow::Result<()> {
    for result in results {
        let Some(normalized) = &result.normalized else {
            continue;
        };
        let output_name = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("statement");

        let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
        fs::write(&output_path, format_normalized(normalized, format, config)?)?;
        debug!("Wrote output to {}", output_path.display());
    }
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "transactions",
        "skipped_rows",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &result.normalized {
            Some(normalized) => {
                let status = if normalized.status.is_clean() {
                    "success"
                } else {
                    normalized.status.as_str()
                };
                wtr.write_record([
                    filename,
                    status,
                    &normalized.len().to_string(),
                    &normalized.skipped.len().to_string(),
                    &result.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "0",
                    "0",
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
