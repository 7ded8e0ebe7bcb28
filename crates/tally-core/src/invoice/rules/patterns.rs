//! Common regex patterns for invoice text scanning.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount at the end of a line: "1,234.56", "1234.56" or "0.99", optionally
    // followed by whitespace. Thousands groups use commas, the fraction is
    // always two digits.
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"([0-9]{1,3}(?:,[0-9]{3})*\.[0-9]{2}|[0-9]+\.[0-9]{2})\s*$"
    ).unwrap();

    // Ten consecutive digits anywhere on a line: the id that opens the next
    // invoice section.
    pub static ref SECTION_ID: Regex = Regex::new(
        r"[0-9]{10}"
    ).unwrap();
}
