//! Amount parsing and formatting.
//!
//! Amounts are kept as [`Decimal`] so that sums and rounding are exact.
//! Rounding to two places is half away from zero on the decimal value.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::TRAILING_AMOUNT;
use crate::error::ExtractionError;

/// Extractor for the amount that ends a line of text.
pub struct TrailingAmountExtractor;

impl TrailingAmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Trailing amount token of a single line.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = TRAILING_AMOUNT.captures(line)?;
        caps.get(1).map(|m| m.as_str())
    }

    /// Trailing amount of a single line.
    ///
    /// `None` when the line does not end in an amount. A token that matches
    /// but does not parse yields the parse error.
    pub fn extract(&self, line: &str) -> Option<Result<Decimal, ExtractionError>> {
        self.match_line(line).map(parse_amount)
    }
}

impl Default for TrailingAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an amount such as "15,250.75" or "1234.5".
///
/// Comma thousands separators are stripped before parsing.
pub fn parse_amount(s: &str) -> Result<Decimal, ExtractionError> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err(ExtractionError::InvalidAmount(s.to_string()));
    }

    Decimal::from_str(&cleaned).map_err(|_| ExtractionError::InvalidAmount(s.to_string()))
}

/// Format an amount with comma thousands separators and two decimals
/// (1234.5 -> "1,234.50").
pub fn format_amount(amount: Decimal) -> String {
    let s = format_fixed(amount);
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let (integer_part, decimal_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}

/// Format an amount with exactly two decimals and no separators
/// (1234.5 -> "1234.50").
pub fn format_fixed(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded.to_string()
}

/// Convert a spreadsheet float to Decimal without binary artifacts
/// (0.1 stays 0.1 rather than 0.1000000000000000055...).
pub fn decimal_from_f64(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_str(&format!("{f}"))
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}
