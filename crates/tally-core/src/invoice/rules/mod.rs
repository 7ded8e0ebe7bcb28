//! Rule-based extractors for invoice text.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_amount, format_fixed, parse_amount, TrailingAmountExtractor};
pub use patterns::*;
