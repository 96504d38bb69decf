//! Core library for Getin Bank statement import.
//!
//! This crate provides:
//! - PDF access and stream-flavour table detection
//! - Region extraction with first-page and continuation-page geometry
//! - Footer cleaning and reduction to the five statement columns
//! - Row normalization (wrapped rows, Polish dates and amounts)
//! - An importer façade for the ledger layer

pub mod error;
pub mod importer;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{CleanError, GetinError, NormalizeError, PdfError, Result, RowError};
pub use importer::{FileMatcher, Importer};
pub use models::config::GetinConfig;
pub use models::table::{CleanedTable, LabeledTable, RawTable};
pub use models::transaction::{CleanStatus, Normalized, SkippedRow, Transaction};
pub use pdf::{PageSelection, PdfDocument, PdfSource, StreamTableEngine, TableEngine};
pub use statement::{FooterCleaner, GroupedRow, RegionExtractor, RowNormalizer, StatementPipeline};
