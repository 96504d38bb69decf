//! Region extraction: one raw grid per page, stitched in page order.

use tracing::debug;

use crate::error::{GetinError, PdfError, Result};
use crate::models::config::{LayoutConfig, TableArea};
use crate::models::table::RawTable;
use crate::pdf::{PageSelection, PdfSource, TableEngine};

/// Reads the transaction table of every page with page-type geometry.
///
/// Page 1 is captured with the shorter first-page area (the letterhead sits
/// above it); pages 2..N use the taller continuation area. Both share the
/// same column boundaries.
pub struct RegionExtractor<E> {
    engine: E,
    layout: LayoutConfig,
}

impl<E: TableEngine> RegionExtractor<E> {
    pub fn new(engine: E, layout: LayoutConfig) -> Self {
        Self { engine, layout }
    }

    /// Extract the raw statement table of a document.
    pub fn extract(&self, source: &dyn PdfSource) -> Result<RawTable> {
        let file = source.file_name();
        let page_count = source
            .page_count()
            .map_err(|e| GetinError::document_read(file, e))?;

        let tables = match page_count {
            0 => return Err(GetinError::document_read(file, PdfError::NoPages)),
            1 => self.read(source, PageSelection::Page(1), &self.layout.first_page_area)?,
            last => {
                let mut tables =
                    self.read(source, PageSelection::Page(1), &self.layout.first_page_area)?;
                tables.extend(self.read(
                    source,
                    PageSelection::Range { first: 2, last },
                    &self.layout.continuation_area,
                )?);
                tables
            }
        };

        let table = RawTable::concat(tables);
        debug!(
            "Extracted {} rows from {} page(s) of {}",
            table.num_rows(),
            page_count,
            file
        );
        Ok(table)
    }

    fn read(
        &self,
        source: &dyn PdfSource,
        pages: PageSelection,
        area: &TableArea,
    ) -> Result<Vec<RawTable>> {
        let tables = self
            .engine
            .read_tables(source, pages, area, &self.layout.columns)
            .map_err(|e| GetinError::document_read(source.file_name(), e))?;

        if tables.len() != pages.count() {
            return Err(GetinError::document_read(
                source.file_name(),
                PdfError::Engine {
                    pages: pages.to_string(),
                    reason: format!("expected {} grids, got {}", pages.count(), tables.len()),
                },
            ));
        }
        Ok(tables)
    }
}
