//! Row grouping and value parsing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{NormalizeError, RowError};
use crate::models::config::{LocaleConfig, NormalizeConfig};
use crate::models::table::{CleanedTable, STATEMENT_COLUMNS, column, is_blank};
use crate::models::transaction::{CleanStatus, Normalized, SkippedRow, Transaction};

use super::rules::{parse_statement_amount, parse_statement_date};

/// Key columns, filled down from the row above when blank.
const KEY_COLUMNS: [usize; 4] = [
    column::TRANSACTION_DATE,
    column::POSTING_DATE,
    column::AMOUNT,
    column::BALANCE,
];

/// One logical transaction before its cells are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    pub transaction_date: String,
    pub posting_date: String,
    pub amount: String,
    pub balance: String,
    /// Non-blank narration fragments joined with the separator.
    pub narration: String,
    /// Number of table rows merged into this one.
    pub source_rows: usize,
}

impl GroupedRow {
    fn key(&self) -> [&str; 4] {
        [
            &self.transaction_date,
            &self.posting_date,
            &self.amount,
            &self.balance,
        ]
    }
}

/// Collapses wrapped table rows into transactions and parses them.
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    date_format: String,
    decimal_separator: char,
    separator: String,
}

impl RowNormalizer {
    pub fn new(locale: &LocaleConfig, normalize: &NormalizeConfig) -> Self {
        Self {
            date_format: locale.date_format.clone(),
            decimal_separator: locale.decimal_separator,
            separator: normalize.narration_separator.clone(),
        }
    }

    /// Merge consecutive rows sharing the same key.
    ///
    /// Blank key cells first inherit the value above them, so a wrapped
    /// continuation line joins the transaction it belongs to.
    pub fn group(&self, table: &CleanedTable) -> Result<Vec<GroupedRow>, NormalizeError> {
        let mut groups: Vec<GroupedRow> = Vec::new();
        let mut carried: [String; 4] = Default::default();

        for (idx, row) in table.rows().iter().enumerate() {
            if row.len() != STATEMENT_COLUMNS {
                return Err(NormalizeError::Grouping {
                    row: idx,
                    found: row.len(),
                });
            }

            for (slot, &col) in carried.iter_mut().zip(KEY_COLUMNS.iter()) {
                let cell = row[col].trim();
                if !cell.is_empty() {
                    *slot = cell.to_string();
                }
            }
            let fragment = row[column::NARRATION].trim();

            match groups.last_mut() {
                Some(group) if group.key() == carried.each_ref().map(String::as_str) => {
                    if !is_blank(fragment) {
                        if !group.narration.is_empty() {
                            group.narration.push_str(&self.separator);
                        }
                        group.narration.push_str(fragment);
                    }
                    group.source_rows += 1;
                }
                _ => {
                    let [transaction_date, posting_date, amount, balance] = carried.clone();
                    groups.push(GroupedRow {
                        transaction_date,
                        posting_date,
                        amount,
                        balance,
                        narration: fragment.to_string(),
                        source_rows: 1,
                    });
                }
            }
        }

        debug!(
            "Grouped {} rows into {} transactions",
            table.num_rows(),
            groups.len()
        );
        Ok(groups)
    }

    /// Group, then parse every group into a [`Transaction`].
    ///
    /// A group whose dates or amounts do not parse is skipped and listed in
    /// [`Normalized::skipped`]; the others are still returned.
    pub fn normalize(
        &self,
        table: &CleanedTable,
        status: CleanStatus,
        source_file: &str,
    ) -> Result<Normalized, NormalizeError> {
        let mut result = Normalized {
            status,
            ..Normalized::default()
        };

        for (index, group) in self.group(table)?.into_iter().enumerate() {
            match self.parse(&group, status, source_file) {
                Ok(transaction) => result.transactions.push(transaction),
                Err(error) => {
                    warn!("{}: skipping row {}: {}", source_file, index, error);
                    result.skipped.push(SkippedRow {
                        index,
                        narration: group.narration,
                        error,
                    });
                }
            }
        }

        Ok(result)
    }

    fn parse(
        &self,
        group: &GroupedRow,
        status: CleanStatus,
        source_file: &str,
    ) -> Result<Transaction, RowError> {
        Ok(Transaction {
            transaction_date: self.date("transaction", &group.transaction_date)?,
            posting_date: self.date("posting", &group.posting_date)?,
            amount: self.amount("amount", &group.amount)?,
            balance: self.amount("balance", &group.balance)?,
            narration: group.narration.clone(),
            status,
            source_file: source_file.to_string(),
        })
    }

    fn date(&self, field: &'static str, value: &str) -> Result<NaiveDate, RowError> {
        parse_statement_date(value, &self.date_format).ok_or_else(|| RowError::DateParse {
            field,
            value: value.to_string(),
        })
    }

    fn amount(&self, field: &'static str, value: &str) -> Result<Decimal, RowError> {
        parse_statement_amount(value, self.decimal_separator).ok_or_else(|| {
            RowError::AmountParse {
                field,
                value: value.to_string(),
            }
        })
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(&LocaleConfig::default(), &NormalizeConfig::default())
    }
}
