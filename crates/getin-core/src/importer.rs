//! Importer façade consumed by the ledger layer.

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{GetinError, Result};
use crate::models::config::{GetinConfig, LedgerConfig};
use crate::models::transaction::{Normalized, Transaction};
use crate::pdf::{PdfDocument, StreamTableEngine, TableEngine};
use crate::statement::StatementPipeline;
use crate::statement::rules::STATEMENT_FILENAME;

/// Decides whether a file is a statement export, by file name only.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    pattern: Regex,
}

impl FileMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| GetinError::Config(format!("invalid filename pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Search the pattern in the final path component.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.is_match(name))
    }
}

impl Default for FileMatcher {
    fn default() -> Self {
        Self {
            pattern: STATEMENT_FILENAME.clone(),
        }
    }
}

/// Getin Bank statement importer.
///
/// Combines the file matcher, the statement pipeline and the configured
/// account and currency, which are passed through unchanged.
pub struct Importer<E = StreamTableEngine> {
    matcher: FileMatcher,
    ledger: LedgerConfig,
    pipeline: StatementPipeline<E>,
}

impl Importer<StreamTableEngine> {
    /// Build an importer backed by the glyph-stream table engine.
    pub fn from_config(config: &GetinConfig) -> Result<Self> {
        Self::with_engine(StreamTableEngine::new(config.layout.row_tolerance), config)
    }
}

impl<E: TableEngine> Importer<E> {
    pub fn with_engine(engine: E, config: &GetinConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            matcher: FileMatcher::new(&config.matcher.filename_pattern)?,
            ledger: config.ledger.clone(),
            pipeline: StatementPipeline::new(engine, config),
        })
    }

    /// Importer identity, including the target account.
    pub fn name(&self) -> String {
        format!("getin.Importer:{}", self.ledger.account)
    }

    /// Check whether a file looks like a statement export.
    pub fn identify(&self, path: &Path) -> bool {
        let matched = self.matcher.matches(path);
        debug!("identify {}: {}", path.display(), matched);
        matched
    }

    pub fn file_account(&self) -> &str {
        &self.ledger.account
    }

    pub fn currency(&self) -> &str {
        &self.ledger.currency
    }

    /// Extract transactions; a statement that cannot be processed yields none.
    pub fn extract(&self, path: &Path) -> Vec<Transaction> {
        match self.extract_detailed(path) {
            Ok(normalized) => normalized.transactions,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Extract transactions and skipped rows, or the error that stopped the
    /// statement.
    pub fn extract_detailed(&self, path: &Path) -> Result<Normalized> {
        let document = PdfDocument::open(path)
            .map_err(|e| GetinError::document_read(path.display().to_string(), e))?;
        self.pipeline.process(&document)
    }
}
