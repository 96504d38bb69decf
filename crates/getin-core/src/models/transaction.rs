//! Normalized statement transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RowError;

/// Outcome of footer cleaning, attached to every row of a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CleanStatus {
    /// Footer found and removed, exactly five columns left.
    #[default]
    Clean,
    /// More than five columns survived truncation; the first five were kept.
    TooManyColumns,
    /// No usable footer cut-off; the untruncated table was used.
    NoCutoff,
}

impl CleanStatus {
    /// Status label; empty for a clean result.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "",
            Self::TooManyColumns => "too many columns",
            Self::NoCutoff => "no cutoff",
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl fmt::Display for CleanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CleanStatus> for String {
    fn from(status: CleanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for CleanStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Self::Clean),
            "too many columns" => Ok(Self::TooManyColumns),
            "no cutoff" => Ok(Self::NoCutoff),
            other => Err(format!("unknown cleaning status: {other:?}")),
        }
    }
}

/// One real-world transaction, possibly assembled from several wrapped rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date the transaction was made (data transakcji).
    pub transaction_date: NaiveDate,
    /// Date the bank booked it (data księgowania).
    pub posting_date: NaiveDate,
    /// Signed amount; negative for debits.
    pub amount: Decimal,
    /// Account balance right after this transaction.
    pub balance: Decimal,
    /// Narration fragments joined in document order.
    pub narration: String,
    /// Footer cleaning outcome for the whole statement.
    pub status: CleanStatus,
    /// Statement the row came from.
    pub source_file: String,
}

/// A grouped row that failed to parse and was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Index of the group within the statement (0-based).
    pub index: usize,
    /// Joined narration of the group, to help locate it in the PDF.
    pub narration: String,
    /// Why it was skipped.
    #[serde(serialize_with = "serialize_display")]
    pub error: RowError,
}

fn serialize_display<S: serde::Serializer>(
    value: &impl fmt::Display,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Normalizer output for one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Normalized {
    /// Footer cleaning outcome of the statement.
    pub status: CleanStatus,
    /// Parsed transactions in statement order.
    pub transactions: Vec<Transaction>,
    /// Groups dropped because a date or amount did not parse.
    pub skipped: Vec<SkippedRow>,
}

impl Normalized {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(CleanStatus::Clean.to_string(), "");
        assert_eq!(CleanStatus::TooManyColumns.to_string(), "too many columns");
        assert_eq!(CleanStatus::NoCutoff.as_str(), "no cutoff");
        assert!(CleanStatus::default().is_clean());
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&CleanStatus::NoCutoff).unwrap();
        assert_eq!(json, "\"no cutoff\"");

        let status: CleanStatus = serde_json::from_str("\"\"").unwrap();
        assert_eq!(status, CleanStatus::Clean);
        assert!(serde_json::from_str::<CleanStatus>("\"bogus\"").is_err());
    }
}
