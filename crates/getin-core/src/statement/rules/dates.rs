//! Date parsing for statement columns.

use chrono::NaiveDate;

/// Parse a statement date cell with a chrono format such as `%Y.%m.%d`.
///
/// Surrounding whitespace is ignored; anything else that does not match the
/// format is rejected.
pub fn parse_statement_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: &str = "%Y.%m.%d";

    #[test]
    fn test_parse_statement_date() {
        assert_eq!(
            parse_statement_date("2023.01.05", FORMAT),
            NaiveDate::from_ymd_opt(2023, 1, 5)
        );
        assert_eq!(
            parse_statement_date(" 2024.12.31 ", FORMAT),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_rejects_other_separators() {
        assert_eq!(parse_statement_date("2023-01-05", FORMAT), None);
        assert_eq!(parse_statement_date("05.01.2023", FORMAT), None);
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert_eq!(parse_statement_date("2023.02.30", FORMAT), None);
        assert_eq!(parse_statement_date("", FORMAT), None);
        assert_eq!(parse_statement_date("Data transakcji", FORMAT), None);
    }
}
