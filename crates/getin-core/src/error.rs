//! Error types for the getin-core library.

use thiserror::Error;

/// Main error type for the getin library.
///
/// Every variant except `Config` is fatal for a single statement only;
/// batch callers log it and move on to the next document.
#[derive(Error, Debug)]
pub enum GetinError {
    /// The document could not be opened, has no pages, or the table engine failed.
    #[error("failed to read {file}: {source}")]
    DocumentRead {
        file: String,
        #[source]
        source: PdfError,
    },

    /// Footer cleaning could not produce a usable table.
    #[error("cleaning error: {0}")]
    Clean(#[from] CleanError),

    /// Rows could not be grouped into transactions.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GetinError {
    /// Wrap a PDF-level failure with the name of the statement it came from.
    pub fn document_read(file: impl Into<String>, source: PdfError) -> Self {
        Self::DocumentRead {
            file: file.into(),
            source,
        }
    }
}

/// Errors related to PDF access and table detection.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The page count could not be determined.
    #[error("page count unavailable: {0}")]
    PageCount(String),

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The table engine failed on a page selection.
    #[error("table extraction failed on pages {pages}: {reason}")]
    Engine { pages: String, reason: String },
}

/// Structural failures of the footer cleaner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    /// The raw table has no rows, or none survive truncation.
    #[error("table is empty")]
    EmptyTable,

    /// Fewer than five non-blank columns.
    #[error("not enough columns: expected 5, found {found}")]
    InsufficientColumns { found: usize },
}

/// Document-level failures of the row normalizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A row does not have the five-cell shape required for grouping.
    #[error("unable to group row {row}: expected 5 cells, found {found}")]
    Grouping { row: usize, found: usize },
}

/// Per-row parse failures. These skip the offending row only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A date cell does not match the statement date format.
    #[error("failed to parse {field} date: {value:?}")]
    DateParse { field: &'static str, value: String },

    /// An amount or balance cell is not a locale-formatted decimal.
    #[error("failed to parse {field}: {value:?}")]
    AmountParse { field: &'static str, value: String },
}

/// Result type for the getin library.
pub type Result<T> = std::result::Result<T, GetinError>;
