//! Common regex patterns for statement identification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Export name: 8 hex, 6 digits, 14 hex, then an 8 digit date, e.g.
    // 0a1b2c3d_123456_0a1b2c3d4e5f6a.20230131.pdf
    pub static ref STATEMENT_FILENAME: Regex = Regex::new(
        r"[0-9a-f]{8}_\d{6}_[0-9a-f]{14}\.\d{8}\.pdf"
    ).unwrap();
}
