//! Data models shared across the library.

pub mod config;
pub mod grid;

pub use config::{
    FinalRowPolicy, GroupingConfig, LocatorConfig, ReconcileConfig, SubtotalPolicy,
    TallyConfig, TotalColumnFallback,
};
pub use grid::{Cell, Row, SpreadsheetGrid};
