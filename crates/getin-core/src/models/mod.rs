//! Data models for the statement pipeline.

pub mod config;
pub mod table;
pub mod transaction;

pub use config::GetinConfig;
pub use table::{CleanedTable, LabeledTable, RawTable};
pub use transaction::{CleanStatus, Normalized, SkippedRow, Transaction};
