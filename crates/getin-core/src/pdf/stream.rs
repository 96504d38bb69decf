//! Stream-flavour table detection on top of pdf-extract glyph positions.
//!
//! Glyphs are merged into words, words inside the capture area are bucketed
//! into rows by baseline, and each word lands in the column whose boundaries
//! contain its horizontal centre.

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

use super::{PageSelection, PdfSource, Result, TableEngine};
use crate::error::PdfError;
use crate::models::config::TableArea;
use crate::models::table::RawTable;

/// Horizontal gap, in multiples of the font size, that still joins two glyphs.
const WORD_GAP: f64 = 0.15;

/// A run of glyphs on one baseline, in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Baseline.
    pub y: f64,
    pub text: String,
}

impl Word {
    pub fn new(x0: f64, x1: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x0,
            x1,
            y,
            text: text.into(),
        }
    }

    /// Horizontal centre.
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Table engine reading positioned text from the PDF content streams.
#[derive(Debug, Clone)]
pub struct StreamTableEngine {
    row_tolerance: f64,
}

impl StreamTableEngine {
    /// Create an engine that merges words whose baselines differ by at most
    /// `row_tolerance` points into one row.
    pub fn new(row_tolerance: f64) -> Self {
        Self { row_tolerance }
    }

    /// Lay out one page's words as a grid with `columns.len() + 1` cells per row.
    pub fn grid_from_words(&self, words: &[Word], area: &TableArea, columns: &[f64]) -> RawTable {
        let mut inside: Vec<&Word> = words
            .iter()
            .filter(|word| area.contains(word.center(), word.y))
            .collect();
        // Top of the page first, then left to right
        inside.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x0.total_cmp(&b.x0)));

        let mut rows: Vec<Vec<&Word>> = Vec::new();
        let mut row_top = f64::NAN;
        for word in inside {
            match rows.last_mut() {
                Some(row) if (row_top - word.y).abs() <= self.row_tolerance => row.push(word),
                _ => {
                    row_top = word.y;
                    rows.push(vec![word]);
                }
            }
        }

        RawTable::new(
            rows.into_iter()
                .map(|row| Self::split_cells(row, columns))
                .collect(),
        )
    }

    fn split_cells(mut row: Vec<&Word>, columns: &[f64]) -> Vec<String> {
        row.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let mut cells = vec![String::new(); columns.len() + 1];
        for word in row {
            let center = word.center();
            let idx = columns.iter().take_while(|&&boundary| center >= boundary).count();
            let cell = &mut cells[idx];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(&word.text);
        }
        cells
    }
}

impl Default for StreamTableEngine {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl TableEngine for StreamTableEngine {
    fn read_tables(
        &self,
        source: &dyn PdfSource,
        pages: PageSelection,
        area: &TableArea,
        columns: &[f64],
    ) -> Result<Vec<RawTable>> {
        let page_count = source.page_count()?;
        if let Some(bad) = pages.pages().find(|&p| p == 0 || p > page_count) {
            return Err(PdfError::InvalidPage(bad));
        }

        let doc = Document::load_mem(source.bytes()).map_err(|e| engine_error(pages, e))?;
        let mut collector = GlyphCollector::default();

        for page in pages.pages() {
            // pdf-extract panics on some malformed content streams
            panic::catch_unwind(AssertUnwindSafe(|| {
                pdf_extract::output_doc_page(&doc, &mut collector, page)
            }))
            .map_err(|payload| engine_error(pages, panic_message(payload.as_ref())))?
            .map_err(|e| engine_error(pages, e))?;
        }

        let mut words = collector.into_words();
        let tables = pages
            .pages()
            .map(|page| {
                let page_words = words.remove(&page).unwrap_or_default();
                let table = self.grid_from_words(&page_words, area, columns);
                debug!(
                    "Page {}: {} words, {} rows inside {}",
                    page,
                    page_words.len(),
                    table.num_rows(),
                    area
                );
                table
            })
            .collect();

        Ok(tables)
    }
}

fn engine_error(pages: PageSelection, reason: impl ToString) -> PdfError {
    PdfError::Engine {
        pages: pages.to_string(),
        reason: reason.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("engine panicked: {msg}")
    } else {
        "engine panicked".to_string()
    }
}

/// Collects words, keyed by page, while pdf-extract renders pages into it.
#[derive(Default)]
struct GlyphCollector {
    page: Option<u32>,
    current: Option<Word>,
    words: BTreeMap<u32, Vec<Word>>,
}

impl GlyphCollector {
    fn flush(&mut self) {
        if let (Some(page), Some(word)) = (self.page, self.current.take()) {
            if !word.text.is_empty() {
                self.words.entry(page).or_default().push(word);
            }
        }
    }

    fn into_words(mut self) -> BTreeMap<u32, Vec<Word>> {
        self.flush();
        self.words
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.flush();
        self.page = Some(page_num);
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        self.page = None;
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        if self.page.is_none() {
            return Ok(());
        }
        if char.trim().is_empty() {
            self.flush();
            return Ok(());
        }

        let size = font_size * (trm.m11 * trm.m11 + trm.m12 * trm.m12).sqrt();
        let (x, y) = (trm.m31, trm.m32);

        let continues = self.current.as_ref().is_some_and(|word| {
            (word.y - y).abs() <= size * 0.5
                && x >= word.x1 - size * 0.5
                && x - word.x1 <= size * WORD_GAP
        });
        if !continues {
            self.flush();
            self.current = Some(Word::new(x, x, y, String::new()));
        }

        if let Some(word) = self.current.as_mut() {
            word.text.push_str(char);
            word.x1 = x + width * size;
            trace!("glyph {:?} at ({:.1}, {:.1})", char, x, y);
        }
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfDocument;
    use crate::pdf::fixtures::{TextItem, build_pdf};
    use pretty_assertions::assert_eq;

    const COLUMNS: [f64; 4] = [95.0, 157.0, 451.0, 520.0];

    fn area() -> TableArea {
        TableArea::new(0.0, 580.0, 567.0, 75.0)
    }

    #[test]
    fn test_grid_from_words_assigns_columns() {
        let engine = StreamTableEngine::default();
        let words = vec![
            Word::new(20.0, 60.0, 500.0, "2023.01.05"),
            Word::new(100.0, 140.0, 500.0, "2023.01.06"),
            Word::new(200.0, 230.0, 500.4, "Przelew"),
            Word::new(235.0, 260.0, 500.0, "na"),
            Word::new(460.0, 500.0, 500.0, "-12,00"),
            Word::new(530.0, 560.0, 500.0, "1 000,00"),
            Word::new(200.0, 240.0, 490.0, "konto"),
        ];

        let table = engine.grid_from_words(&words, &area(), &COLUMNS);

        assert_eq!(
            table.rows(),
            &[
                vec!["2023.01.05", "2023.01.06", "Przelew na", "-12,00", "1 000,00"],
                vec!["", "", "konto", "", ""],
            ]
        );
    }

    #[test]
    fn test_grid_from_words_ignores_words_outside_area() {
        let engine = StreamTableEngine::default();
        let words = vec![
            Word::new(20.0, 60.0, 700.0, "Letterhead"),
            Word::new(20.0, 60.0, 300.0, "2023.01.05"),
            Word::new(20.0, 60.0, 40.0, "Page 1/2"),
        ];

        let table = engine.grid_from_words(&words, &area(), &COLUMNS);
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.rows()[0][0], "2023.01.05");
    }

    #[test]
    fn test_read_tables_from_pdf() {
        let data = build_pdf(&[vec![
            TextItem::new(20, 500, "2023.01.05"),
            TextItem::new(100, 500, "2023.01.06"),
            TextItem::new(200, 500, "Przelew"),
            TextItem::new(460, 500, "-12,00"),
            TextItem::new(530, 500, "988,00"),
            TextItem::new(200, 490, "czynsz"),
            TextItem::new(20, 700, "Wyciag"),
        ]]);
        let doc = PdfDocument::from_bytes("statement.pdf", &data).unwrap();

        let tables = StreamTableEngine::default()
            .read_tables(&doc, PageSelection::Page(1), &area(), &COLUMNS)
            .unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0].rows(),
            &[
                vec!["2023.01.05", "2023.01.06", "Przelew", "-12,00", "988,00"],
                vec!["", "", "czynsz", "", ""],
            ]
        );
    }

    #[test]
    fn test_read_tables_renders_only_selected_pages() {
        let page = |text: &'static str| {
            vec![
                TextItem::new(20, 500, "2023.01.05"),
                TextItem::new(200, 500, text),
                TextItem::new(530, 500, "1,00"),
            ]
        };
        let data = build_pdf(&[page("first"), page("second"), page("third")]);
        let doc = PdfDocument::from_bytes("statement.pdf", &data).unwrap();

        let tables = StreamTableEngine::default()
            .read_tables(&doc, PageSelection::Range { first: 2, last: 3 }, &area(), &COLUMNS)
            .unwrap();

        let narration: Vec<&str> = tables.iter().map(|t| t.rows()[0][2].as_str()).collect();
        assert_eq!(narration, vec!["second", "third"]);
    }

    #[test]
    fn test_read_tables_rejects_missing_page() {
        let data = build_pdf(&[vec![TextItem::new(20, 500, "x")]]);
        let doc = PdfDocument::from_bytes("statement.pdf", &data).unwrap();

        let err = StreamTableEngine::default()
            .read_tables(&doc, PageSelection::Range { first: 2, last: 3 }, &area(), &COLUMNS)
            .unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(2)));
    }
}
