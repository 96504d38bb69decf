//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use getin_core::models::config::{GetinConfig, parse_coordinates};

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a configuration value or a whole section
    Get {
        /// Field such as "layout.first_page_area", or a section such as "footer"
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Field such as "ledger.currency"
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<GetinConfig> {
    if path.exists() {
        Ok(GetinConfig::from_file(path)?)
    } else {
        Ok(GetinConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = read_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, default_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(default_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = GetinConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let config = read_or_default(path)?;

    let value = match Section::from_name(key) {
        Some(section) => section.value(&config)?,
        None => key.parse::<ConfigKey>()?.value(&config)?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let key: ConfigKey = key.parse()?;
    let mut config = read_or_default(path)?;

    key.assign(&mut config, value)?;
    config.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key.name(),
        serde_json::to_string(&key.value(&config)?)?
    );

    Ok(())
}

/// Top-level sections of [`GetinConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Layout,
    Footer,
    Locale,
    Normalize,
    Ledger,
    Matcher,
}

impl Section {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "layout" => Self::Layout,
            "footer" => Self::Footer,
            "locale" => Self::Locale,
            "normalize" => Self::Normalize,
            "ledger" => Self::Ledger,
            "matcher" => Self::Matcher,
            _ => return None,
        })
    }

    fn value(self, config: &GetinConfig) -> serde_json::Result<Value> {
        match self {
            Self::Layout => serde_json::to_value(&config.layout),
            Self::Footer => serde_json::to_value(&config.footer),
            Self::Locale => serde_json::to_value(&config.locale),
            Self::Normalize => serde_json::to_value(&config.normalize),
            Self::Ledger => serde_json::to_value(&config.ledger),
            Self::Matcher => serde_json::to_value(&config.matcher),
        }
    }
}

/// A single settable field, addressed as `section.field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKey {
    FirstPageArea,
    ContinuationArea,
    Columns,
    RowTolerance,
    Markers,
    MarkerColumn,
    DateFormat,
    DecimalSeparator,
    NarrationSeparator,
    Account,
    Currency,
    FilenamePattern,
}

impl ConfigKey {
    const ALL: [ConfigKey; 12] = [
        Self::FirstPageArea,
        Self::ContinuationArea,
        Self::Columns,
        Self::RowTolerance,
        Self::Markers,
        Self::MarkerColumn,
        Self::DateFormat,
        Self::DecimalSeparator,
        Self::NarrationSeparator,
        Self::Account,
        Self::Currency,
        Self::FilenamePattern,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::FirstPageArea => "layout.first_page_area",
            Self::ContinuationArea => "layout.continuation_area",
            Self::Columns => "layout.columns",
            Self::RowTolerance => "layout.row_tolerance",
            Self::Markers => "footer.markers",
            Self::MarkerColumn => "footer.marker_column",
            Self::DateFormat => "locale.date_format",
            Self::DecimalSeparator => "locale.decimal_separator",
            Self::NarrationSeparator => "normalize.narration_separator",
            Self::Account => "ledger.account",
            Self::Currency => "ledger.currency",
            Self::FilenamePattern => "matcher.filename_pattern",
        }
    }

    fn value(self, config: &GetinConfig) -> serde_json::Result<Value> {
        match self {
            Self::FirstPageArea => serde_json::to_value(config.layout.first_page_area),
            Self::ContinuationArea => serde_json::to_value(config.layout.continuation_area),
            Self::Columns => serde_json::to_value(&config.layout.columns),
            Self::RowTolerance => serde_json::to_value(config.layout.row_tolerance),
            Self::Markers => serde_json::to_value(&config.footer.markers),
            Self::MarkerColumn => serde_json::to_value(config.footer.marker_column),
            Self::DateFormat => serde_json::to_value(&config.locale.date_format),
            Self::DecimalSeparator => serde_json::to_value(config.locale.decimal_separator),
            Self::NarrationSeparator => serde_json::to_value(&config.normalize.narration_separator),
            Self::Account => serde_json::to_value(&config.ledger.account),
            Self::Currency => serde_json::to_value(&config.ledger.currency),
            Self::FilenamePattern => serde_json::to_value(&config.matcher.filename_pattern),
        }
    }

    /// Parse `raw` into the field's type and store it.
    fn assign(self, config: &mut GetinConfig, raw: &str) -> anyhow::Result<()> {
        let raw = raw.trim();
        match self {
            Self::FirstPageArea => config.layout.first_page_area = raw.parse()?,
            Self::ContinuationArea => config.layout.continuation_area = raw.parse()?,
            Self::Columns => config.layout.columns = parse_coordinates(unbracket(raw))?,
            Self::RowTolerance => {
                config.layout.row_tolerance = raw
                    .parse()
                    .with_context(|| format!("row tolerance must be a number, got {raw:?}"))?
            }
            Self::Markers => config.footer.markers = parse_list(raw)?,
            Self::MarkerColumn => {
                config.footer.marker_column = raw
                    .parse()
                    .with_context(|| format!("marker column must be a grid index, got {raw:?}"))?
            }
            Self::DateFormat => config.locale.date_format = unquote(raw)?,
            Self::DecimalSeparator => {
                let text = unquote(raw)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => config.locale.decimal_separator = c,
                    _ => anyhow::bail!("decimal separator must be a single character, got {raw:?}"),
                }
            }
            Self::NarrationSeparator => config.normalize.narration_separator = unquote(raw)?,
            Self::Account => config.ledger.account = unquote(raw)?,
            Self::Currency => config.ledger.currency = unquote(raw)?,
            Self::FilenamePattern => config.matcher.filename_pattern = unquote(raw)?,
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|key| key.name()).collect();
                anyhow::anyhow!(
                    "Configuration key not found: {} (known keys: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// Accept `"text"` as well as bare `text`.
fn unquote(raw: &str) -> anyhow::Result<String> {
    if raw.starts_with('"') {
        Ok(serde_json::from_str(raw).with_context(|| format!("invalid string {raw}"))?)
    } else {
        Ok(raw.to_string())
    }
}

fn unbracket(raw: &str) -> &str {
    raw.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(raw)
}

/// A JSON array of strings, or a comma separated list.
fn parse_list(raw: &str) -> anyhow::Result<Vec<String>> {
    if raw.starts_with('[') {
        return serde_json::from_str(raw).with_context(|| format!("invalid list {raw}"));
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'getin config init' to create a configuration file.");
    }

    Ok(())
}
