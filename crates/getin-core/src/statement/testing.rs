//! Scripted document and engine doubles for pipeline tests.

use std::cell::RefCell;

use crate::error::PdfError;
use crate::models::config::TableArea;
use crate::models::table::RawTable;
use crate::pdf::{PageSelection, PdfSource, Result, TableEngine};

/// A document that only knows its name and page count.
pub struct FakeSource {
    name: String,
    pages: std::result::Result<u32, String>,
}

impl FakeSource {
    pub fn new(name: &str, pages: u32) -> Self {
        Self {
            name: name.to_string(),
            pages: Ok(pages),
        }
    }

    pub fn unreadable(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            pages: Err(reason.to_string()),
        }
    }
}

impl PdfSource for FakeSource {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> Result<u32> {
        self.pages.clone().map_err(PdfError::PageCount)
    }

    fn bytes(&self) -> &[u8] {
        &[]
    }
}

/// Returns a fixed grid per page and records every call.
#[derive(Default)]
pub struct FakeEngine {
    pages: Vec<RawTable>,
    failure: Option<String>,
    pub calls: RefCell<Vec<(PageSelection, TableArea)>>,
}

impl FakeEngine {
    /// Page `n` (1-indexed) returns `pages[n - 1]`.
    pub fn with_pages(pages: Vec<RawTable>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

impl TableEngine for FakeEngine {
    fn read_tables(
        &self,
        _source: &dyn PdfSource,
        pages: PageSelection,
        area: &TableArea,
        _columns: &[f64],
    ) -> Result<Vec<RawTable>> {
        self.calls.borrow_mut().push((pages, *area));
        if let Some(reason) = &self.failure {
            return Err(PdfError::Engine {
                pages: pages.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(pages
            .pages()
            .map(|page| {
                self.pages
                    .get(page as usize - 1)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }
}

/// Cells of one statement row.
pub fn row(cells: [&str; 5]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}
