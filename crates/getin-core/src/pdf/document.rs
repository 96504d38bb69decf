//! Statement PDF handle backed by lopdf.

use lopdf::Document;
use std::path::Path;
use tracing::debug;

use super::{PdfSource, Result};
use crate::error::PdfError;

/// A loaded statement PDF.
///
/// Holds the decrypted bytes for the table engine and the page count
/// established at load time.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    file_name: String,
    raw_data: Vec<u8>,
    page_count: u32,
}

impl PdfDocument {
    /// Read and parse a statement from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(file_name, &data)
    }

    /// Parse a statement held in memory.
    pub fn from_bytes(file_name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let file_name = file_name.into();
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Bank exports are sometimes encrypted with an empty user password
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted {} with empty password", file_name);

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = u32::try_from(doc.get_pages().len())
            .map_err(|e| PdfError::PageCount(e.to_string()))?;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded {} with {} pages", file_name, page_count);
        Ok(Self {
            file_name,
            raw_data,
            page_count,
        })
    }
}

impl PdfSource for PdfDocument {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn page_count(&self) -> Result<u32> {
        Ok(self.page_count)
    }

    fn bytes(&self) -> &[u8] {
        &self.raw_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{build_pdf, TextItem};

    #[test]
    fn test_load_counts_pages() {
        let data = build_pdf(&[
            vec![TextItem::new(20, 500, "2023.01.05")],
            vec![TextItem::new(20, 700, "2023.01.06")],
        ]);

        let doc = PdfDocument::from_bytes("statement.pdf", &data).unwrap();
        assert_eq!(doc.page_count().unwrap(), 2);
        assert_eq!(doc.file_name(), "statement.pdf");
        assert!(!doc.bytes().is_empty());
    }

    #[test]
    fn test_zero_pages_is_rejected() {
        let data = build_pdf(&[]);
        let err = PdfDocument::from_bytes("empty.pdf", &data).unwrap_err();
        assert!(matches!(err, PdfError::NoPages));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = PdfDocument::from_bytes("junk.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = PdfDocument::open(Path::new("/nonexistent/statement.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }
}
