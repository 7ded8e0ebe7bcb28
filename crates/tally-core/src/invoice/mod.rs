//! Invoice text scanning.

pub mod document;
mod locator;
pub mod rules;

pub use document::Document;
pub use locator::{AmountSource, LocatedAmount, TextAmountLocator};
