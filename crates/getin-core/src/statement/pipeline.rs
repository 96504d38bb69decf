//! Extract → clean → normalize for one statement.

use std::time::Instant;

use tracing::{info, warn};

use crate::error::Result;
use crate::models::config::GetinConfig;
use crate::models::transaction::{Normalized, Transaction};
use crate::pdf::{PdfSource, StreamTableEngine, TableEngine};

use super::{FooterCleaner, RegionExtractor, RowNormalizer};

/// Runs the three statement stages over one document at a time.
///
/// Holds no state between documents; callers may run several pipelines in
/// parallel over different files.
pub struct StatementPipeline<E> {
    extractor: RegionExtractor<E>,
    cleaner: FooterCleaner,
    normalizer: RowNormalizer,
}

impl StatementPipeline<StreamTableEngine> {
    /// Pipeline backed by the glyph-stream table engine.
    pub fn from_config(config: &GetinConfig) -> Self {
        Self::new(StreamTableEngine::new(config.layout.row_tolerance), config)
    }
}

impl<E: TableEngine> StatementPipeline<E> {
    pub fn new(engine: E, config: &GetinConfig) -> Self {
        Self {
            extractor: RegionExtractor::new(engine, config.layout.clone()),
            cleaner: FooterCleaner::new(&config.footer),
            normalizer: RowNormalizer::new(&config.locale, &config.normalize),
        }
    }

    /// Process one statement, failing on any document-level error.
    pub fn process(&self, source: &dyn PdfSource) -> Result<Normalized> {
        let start = Instant::now();
        let file = source.file_name();

        let raw = self.extractor.extract(source)?;
        let (cleaned, status) = self.cleaner.clean(raw)?;
        if !status.is_clean() {
            warn!("{}: footer cleaning anomaly: {}", file, status);
        }
        let normalized = self.normalizer.normalize(&cleaned, status, file)?;

        info!(
            "{}: {} transactions, {} skipped rows in {} ms",
            file,
            normalized.len(),
            normalized.skipped.len(),
            start.elapsed().as_millis()
        );
        Ok(normalized)
    }

    /// Process one statement; a document-level failure is logged and yields
    /// no transactions.
    pub fn process_or_empty(&self, source: &dyn PdfSource) -> Vec<Transaction> {
        match self.process(source) {
            Ok(normalized) => normalized.transactions,
            Err(e) => {
                warn!("{}: statement not processed: {}", source.file_name(), e);
                Vec::new()
            }
        }
    }
}
