//! Locale rules for statement cells.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{format_statement_amount, parse_statement_amount};
pub use dates::parse_statement_date;
pub use patterns::STATEMENT_FILENAME;
