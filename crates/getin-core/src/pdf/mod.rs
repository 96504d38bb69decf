//! PDF access and table detection.

mod document;
mod stream;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::PdfDocument;
pub use stream::{StreamTableEngine, Word};

use std::fmt;

use crate::error::PdfError;
use crate::models::config::TableArea;
use crate::models::table::RawTable;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// An open statement document.
pub trait PdfSource {
    /// File name used in diagnostics and as row provenance.
    fn file_name(&self) -> &str;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> Result<u32>;

    /// Raw (decrypted) PDF bytes.
    fn bytes(&self) -> &[u8];
}

/// Pages a table engine call should read, 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    /// A single page.
    Page(u32),
    /// Pages `first..=last`.
    Range { first: u32, last: u32 },
}

impl PageSelection {
    /// Number of selected pages.
    pub fn count(&self) -> usize {
        match *self {
            Self::Page(_) => 1,
            Self::Range { first, last } => last.saturating_sub(first) as usize + 1,
        }
    }

    /// Iterate selected pages in order.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        let (first, last) = match *self {
            Self::Page(p) => (p, p),
            Self::Range { first, last } => (first, last),
        };
        first..=last
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(p) => write!(f, "{p}"),
            Self::Range { first, last } => write!(f, "{first}-{last}"),
        }
    }
}

/// Table detection service.
///
/// Given a document, a page selection, a capture area and column boundaries,
/// returns one grid of text cells per selected page, in page order.
pub trait TableEngine {
    fn read_tables(
        &self,
        source: &dyn PdfSource,
        pages: PageSelection,
        area: &TableArea,
        columns: &[f64],
    ) -> Result<Vec<RawTable>>;
}

impl<T: TableEngine + ?Sized> TableEngine for &T {
    fn read_tables(
        &self,
        source: &dyn PdfSource,
        pages: PageSelection,
        area: &TableArea,
        columns: &[f64],
    ) -> Result<Vec<RawTable>> {
        (**self).read_tables(source, pages, area, columns)
    }
}
