//! Configuration structures for the statement pipeline.
//!
//! Defaults describe the Getin Bank statement layout; a JSON file only needs
//! to carry the fields it overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GetinError;

/// Main configuration for the getin pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetinConfig {
    /// Page geometry handed to the table engine.
    pub layout: LayoutConfig,

    /// Footer detection.
    pub footer: FooterConfig,

    /// Date and number conventions.
    pub locale: LocaleConfig,

    /// Row grouping.
    pub normalize: NormalizeConfig,

    /// Values passed through to the ledger layer.
    pub ledger: LedgerConfig,

    /// Statement file identification.
    pub matcher: MatcherConfig,
}

/// A rectangular page region in PDF points, origin bottom-left.
///
/// Written as `x1,y1,x2,y2` where (x1, y1) is the top-left corner and
/// (x2, y2) the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableArea {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl TableArea {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Check whether a point lies inside the area (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y <= self.y1 && y >= self.y2
    }
}

impl FromStr for TableArea {
    type Err = GetinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = parse_coordinates(s)?;
        match coords.as_slice() {
            &[x1, y1, x2, y2] if x1 < x2 && y1 > y2 => Ok(Self { x1, y1, x2, y2 }),
            &[_, _, _, _] => Err(GetinError::Config(format!(
                "table area {s:?} must be given as left,top,right,bottom"
            ))),
            _ => Err(GetinError::Config(format!(
                "table area {s:?} needs exactly 4 coordinates"
            ))),
        }
    }
}

impl TryFrom<String> for TableArea {
    type Error = GetinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableArea> for String {
    fn from(area: TableArea) -> Self {
        area.to_string()
    }
}

impl fmt::Display for TableArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Parse a comma separated coordinate list such as `95,157,451,520`.
pub fn parse_coordinates(s: &str) -> Result<Vec<f64>, GetinError> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| GetinError::Config(format!("invalid coordinate {part:?} in {s:?}")))
        })
        .collect()
}

/// Region geometry for the two page types of a statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Capture window on page 1, below the letterhead.
    pub first_page_area: TableArea,

    /// Capture window on pages 2..N.
    pub continuation_area: TableArea,

    /// Column separator x-coordinates, ascending.
    pub columns: Vec<f64>,

    /// Maximum baseline distance (points) for words to share a row.
    pub row_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            first_page_area: TableArea::new(0.0, 580.0, 567.0, 75.0),
            continuation_area: TableArea::new(0.0, 730.0, 575.0, 75.0),
            columns: vec![95.0, 157.0, 451.0, 520.0],
            row_tolerance: 2.0,
        }
    }
}

/// Footer marker detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Substrings that open the summary block at the end of a statement.
    pub markers: Vec<String>,

    /// Grid column (0-based, before blank columns are dropped) scanned for markers.
    pub marker_column: usize,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            markers: vec![
                "Uznania".to_string(),
                "Obciążenia".to_string(),
                "Saldo końcowe".to_string(),
            ],
            marker_column: 2,
        }
    }
}

/// Date and number formats of the statement locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// chrono format string for both date columns.
    pub date_format: String,

    /// Decimal separator in amounts; whitespace is always the thousands separator.
    pub decimal_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y.%m.%d".to_string(),
            decimal_separator: ',',
        }
    }
}

/// Row grouping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Delimiter placed between the narration fragments of a wrapped entry.
    pub narration_separator: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            narration_separator: "^^^".to_string(),
        }
    }
}

/// Ledger identity passed through to the posting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Source account of every imported transaction.
    pub account: String,

    /// Currency code of the statement.
    pub currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account: "Assets:PL:GetinBank".to_string(),
            currency: "PLN".to_string(),
        }
    }
}

/// Statement file name matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Regular expression searched in the file name.
    pub filename_pattern: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            filename_pattern: crate::statement::rules::patterns::STATEMENT_FILENAME
                .as_str()
                .to_string(),
        }
    }
}

impl GetinConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), GetinError> {
        let columns = &self.layout.columns;
        if columns.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GetinError::Config(format!(
                "column boundaries must be strictly ascending: {columns:?}"
            )));
        }
        if columns.len() < 4 {
            return Err(GetinError::Config(format!(
                "at least 4 column boundaries are needed for 5 columns, got {}",
                columns.len()
            )));
        }
        if self.layout.row_tolerance < 0.0 {
            return Err(GetinError::Config("row tolerance must not be negative".to_string()));
        }
        if self.footer.markers.iter().any(String::is_empty) {
            return Err(GetinError::Config("footer markers must not be empty".to_string()));
        }
        if self.normalize.narration_separator.is_empty() {
            return Err(GetinError::Config("narration separator must not be empty".to_string()));
        }
        regex::Regex::new(&self.matcher.filename_pattern)
            .map_err(|e| GetinError::Config(format!("invalid filename pattern: {e}")))?;
        Ok(())
    }
}
