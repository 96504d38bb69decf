//! Statement table pipeline: region extraction, footer cleaning and row
//! normalization.

mod cleaner;
mod extractor;
mod normalizer;
mod pipeline;
pub mod rules;

#[cfg(test)]
pub(crate) mod testing;

pub use cleaner::FooterCleaner;
pub use extractor::RegionExtractor;
pub use normalizer::{GroupedRow, RowNormalizer};
pub use pipeline::StatementPipeline;
