//! Amount parsing for statement columns.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a statement amount such as `"1 234,56"` or `"-12,00"`.
///
/// Whitespace (including non-breaking spaces) is the thousands separator and
/// is dropped; `decimal_separator` becomes a decimal point. The result is an
/// exact decimal.
pub fn parse_statement_amount(s: &str, decimal_separator: char) -> Option<Decimal> {
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == decimal_separator { '.' } else { c })
        .collect();

    let digits = normalized.strip_prefix(['-', '+']).unwrap_or(&normalized);
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1
        && digits.starts_with(|c: char| c.is_ascii_digit())
        && !digits.ends_with('.');
    if !well_formed {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// Format an amount in statement style (`1 234,56`).
pub fn format_statement_amount(amount: Decimal, decimal_separator: char) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{}{}{}", formatted, decimal_separator, decimal_part)
}
