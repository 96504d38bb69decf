//! Rectangular text tables passed between the pipeline stages.

/// Number of logical columns in a cleaned statement table.
pub const STATEMENT_COLUMNS: usize = 5;

/// Column roles of a cleaned table, in grid order.
pub mod column {
    pub const TRANSACTION_DATE: usize = 0;
    pub const POSTING_DATE: usize = 1;
    pub const NARRATION: usize = 2;
    pub const AMOUNT: usize = 3;
    pub const BALANCE: usize = 4;
}

/// Grid of text cells as returned by the table engine.
///
/// Rows keep document order. Rows may have different lengths until the
/// table is turned into a [`LabeledTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from owned rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Create a table from borrowed cell text.
    pub fn from_cells<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Concatenate per-page tables in page order.
    pub fn concat(tables: impl IntoIterator<Item = RawTable>) -> Self {
        let mut combined = Self::default();
        for table in tables {
            combined.append(table);
        }
        combined
    }

    /// Append the rows of another table after the last row of this one.
    pub fn append(&mut self, other: RawTable) {
        self.rows.extend(other.rows);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Rectangular table whose columns remember their original grid position.
///
/// Every reshaping operation returns a new table and checks its shape, so a
/// cleaning step can always fall back to an earlier snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTable {
    labels: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl LabeledTable {
    /// Pad ragged rows with empty cells and label columns `0..width`.
    pub fn from_raw(raw: RawTable) -> Self {
        let width = raw.width();
        let rows: Vec<Vec<String>> = raw
            .into_rows()
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let table = Self {
            labels: (0..width).collect(),
            rows,
        };
        table.debug_assert_rectangular();
        table
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Position of the column that started out at grid column `label`.
    pub fn position_of(&self, label: usize) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Cell text of the column labelled `label`, one entry per row.
    pub fn column(&self, label: usize) -> Option<impl Iterator<Item = &str>> {
        let idx = self.position_of(label)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Drop every column whose cells are all blank.
    pub fn drop_blank_columns(&self) -> Self {
        let keep: Vec<usize> = (0..self.width())
            .filter(|&idx| self.rows.iter().any(|row| !is_blank(&row[idx])))
            .collect();

        let result = self.select_positions(&keep);
        debug_assert_eq!(result.num_rows(), self.num_rows());
        debug_assert!(result.width() <= self.width());
        result
    }

    /// Keep rows `[0, end)`.
    pub fn truncate(&self, end: usize) -> Self {
        let end = end.min(self.num_rows());
        let result = Self {
            labels: self.labels.clone(),
            rows: self.rows[..end].to_vec(),
        };
        debug_assert_eq!(result.num_rows(), end);
        debug_assert_eq!(result.width(), self.width());
        result
    }

    /// Keep the first `n` columns, whatever their labels.
    ///
    /// Returns `None` if the table is narrower than `n`.
    pub fn leading_columns(&self, n: usize) -> Option<Self> {
        if self.width() < n {
            return None;
        }
        let positions: Vec<usize> = (0..n).collect();
        let result = self.select_positions(&positions);
        debug_assert_eq!(result.width(), n);
        Some(result)
    }

    fn select_positions(&self, positions: &[usize]) -> Self {
        let table = Self {
            labels: positions.iter().map(|&idx| self.labels[idx]).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| positions.iter().map(|&idx| row[idx].clone()).collect())
                .collect(),
        };
        table.debug_assert_rectangular();
        table
    }

    fn debug_assert_rectangular(&self) {
        debug_assert!(self.rows.iter().all(|row| row.len() == self.labels.len()));
    }
}

/// Five-column statement table with the footer removed.
///
/// Columns follow [`column`]: transaction date, posting date, narration
/// fragment, amount, balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedTable {
    rows: Vec<Vec<String>>,
}

impl CleanedTable {
    /// Build a table from rows in statement column order.
    ///
    /// Row shapes are not checked here; the normalizer rejects rows that do
    /// not have exactly five cells.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Accept a labelled table of exactly five columns.
    pub fn from_labeled(table: LabeledTable) -> Option<Self> {
        (table.width() == STATEMENT_COLUMNS).then(|| Self { rows: table.rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// View the table as raw cells again, e.g. to re-run cleaning on it.
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(self.rows.clone())
    }
}

/// Cells holding only whitespace count as empty.
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}
