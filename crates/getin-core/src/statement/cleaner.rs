//! Footer detection and column reduction.

use tracing::debug;

use crate::error::CleanError;
use crate::models::config::FooterConfig;
use crate::models::table::{CleanedTable, LabeledTable, RawTable, STATEMENT_COLUMNS};
use crate::models::transaction::CleanStatus;

/// Cuts the summary footer off a raw statement table and reduces it to the
/// five statement columns.
///
/// The footer starts at the first row whose marker column mentions one of
/// the configured markers ("Uznania", "Obciążenia", "Saldo końcowe" by
/// default). The marker column is addressed by its grid position, so it is
/// found even after blank columns have been dropped.
#[derive(Debug, Clone)]
pub struct FooterCleaner {
    markers: Vec<String>,
    marker_column: usize,
}

impl FooterCleaner {
    pub fn new(config: &FooterConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            marker_column: config.marker_column,
        }
    }

    /// Clean a raw table.
    ///
    /// Fallback order when the truncated table is not exactly five columns:
    /// 1. more than five columns: keep its first five surviving columns
    ///    ("too many columns");
    /// 2. fewer than five: use the untruncated table, reduced to its first
    ///    five surviving columns when wider ("no cutoff").
    pub fn clean(&self, raw: RawTable) -> Result<(CleanedTable, CleanStatus), CleanError> {
        if raw.is_empty() {
            return Err(CleanError::EmptyTable);
        }

        let full = LabeledTable::from_raw(raw).drop_blank_columns();
        if full.width() < STATEMENT_COLUMNS {
            return Err(CleanError::InsufficientColumns {
                found: full.width(),
            });
        }

        match self.find_marker(&full) {
            Some(0) => {
                debug!("Footer marker on the first row, no transactions left");
                return Err(CleanError::EmptyTable);
            }
            Some(cutoff) => {
                let truncated = full.truncate(cutoff);
                let reduced = truncated.drop_blank_columns();
                debug!(
                    "Footer at row {}: {} rows, {} columns left",
                    cutoff,
                    reduced.num_rows(),
                    reduced.width()
                );

                if let Some(table) = leading_statement_columns(&reduced) {
                    let status = if reduced.width() == STATEMENT_COLUMNS {
                        CleanStatus::Clean
                    } else {
                        debug!("Keeping grid columns {:?}", &reduced.labels()[..STATEMENT_COLUMNS]);
                        CleanStatus::TooManyColumns
                    };
                    return Ok((table, status));
                }
                debug!("Truncated table too narrow, falling back to the full table");
            }
            None => debug!("No footer marker found"),
        }

        let found = full.width();
        leading_statement_columns(&full)
            .map(|table| (table, CleanStatus::NoCutoff))
            .ok_or(CleanError::InsufficientColumns { found })
    }

    /// Index of the first footer row.
    fn find_marker(&self, table: &LabeledTable) -> Option<usize> {
        table
            .column(self.marker_column)?
            .position(|cell| self.markers.iter().any(|marker| cell.contains(marker.as_str())))
    }
}

impl Default for FooterCleaner {
    fn default() -> Self {
        Self::new(&FooterConfig::default())
    }
}

/// First five columns by position. `None` only when the table is narrower.
fn leading_statement_columns(table: &LabeledTable) -> Option<CleanedTable> {
    table
        .leading_columns(STATEMENT_COLUMNS)
        .and_then(CleanedTable::from_labeled)
}
