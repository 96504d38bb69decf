//! Subcommands and the output formats they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use getin_core::models::config::GetinConfig;
use getin_core::statement::rules::format_statement_amount;
use getin_core::{Normalized, Transaction};
use tracing::debug;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("getin")
        .join("config.json")
}

/// Load the config given with `-c`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GetinConfig> {
    let config = match config_path {
        Some(path) => GetinConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Cannot load config {}: {}", path, e))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config {}", path.display());
                GetinConfig::from_file(&path)?
            } else {
                GetinConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

pub fn format_normalized(
    normalized: &Normalized,
    format: OutputFormat,
    config: &GetinConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(normalized)?),
        OutputFormat::Csv => format_transactions_csv(&normalized.transactions),
        OutputFormat::Text => Ok(format_transactions_text(
            &normalized.transactions,
            config,
        )),
    }
}

fn format_transactions_csv(transactions: &[Transaction]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "transaction_date",
        "posting_date",
        "amount",
        "balance",
        "narration",
        "status",
        "source_file",
    ])?;

    for tx in transactions {
        wtr.write_record([
            &tx.transaction_date.to_string(),
            &tx.posting_date.to_string(),
            &tx.amount.to_string(),
            &tx.balance.to_string(),
            &tx.narration,
            tx.status.as_str(),
            &tx.source_file,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_transactions_text(transactions: &[Transaction], config: &GetinConfig) -> String {
    let sep = config.locale.decimal_separator;
    let currency = &config.ledger.currency;
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n\n", config.ledger.account));
    for tx in transactions {
        output.push_str(&format!(
            "{}  {}  {:>14} {}  {:>14}  {}\n",
            tx.transaction_date,
            tx.posting_date,
            format_statement_amount(tx.amount, sep),
            currency,
            format_statement_amount(tx.balance, sep),
            tx.narration
        ));
    }
    output.push_str(&format!("\n{} transactions\n", transactions.len()));

    output
}
