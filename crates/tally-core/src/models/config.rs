//! Configuration structures for grouping and reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::TallyError;

/// How the last row of the grouped grid is treated when summing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalRowPolicy {
    /// The last row closes the final group like a separator would: it is
    /// left out of the sum and the subtotal goes in front of it.
    #[default]
    Boundary,
    /// The last row is summed with its group and the subtotal follows it.
    PartOfGroup,
}

/// Main configuration for tally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Spreadsheet grouping configuration.
    pub grouping: GroupingConfig,

    /// Document scanning configuration.
    pub locator: LocatorConfig,

    /// Reconciliation configuration.
    pub reconcile: ReconcileConfig,
}

/// What to do when totals are requested without a total column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalColumnFallback {
    /// Sum the reference column instead.
    #[default]
    ReferenceColumn,
    /// Group without subtotals.
    SkipTotals,
    /// Fail the call.
    Reject,
}

/// Which group sums produce a subtotal row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtotalPolicy {
    /// Only sums strictly greater than zero.
    #[default]
    PositiveOnly,
    /// Any sum other than zero.
    NonZero,
    /// Every non-empty group, including zero sums.
    Always,
}

impl SubtotalPolicy {
    /// Whether a group with this sum gets a subtotal row.
    pub fn accepts(self, sum: rust_decimal::Decimal) -> bool {
        match self {
            SubtotalPolicy::PositiveOnly => sum.is_sign_positive() && !sum.is_zero(),
            SubtotalPolicy::NonZero => !sum.is_zero(),
            SubtotalPolicy::Always => true,
        }
    }
}

/// Spreadsheet grouping configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Behaviour when totals are requested without a total column.
    pub total_column_fallback: TotalColumnFallback,

    /// Which group sums get a subtotal row.
    pub subtotal_policy: SubtotalPolicy,

    /// Treatment of the grid's last row.
    pub final_row: FinalRowPolicy,
}

/// Document scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Text that ends a section (document-level total line).
    pub boundary_marker: String,

    /// Line prefix that makes the amount before the previous one win.
    pub subtotal_marker: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            boundary_marker: "Total facture".to_string(),
            subtotal_marker: "Sous-Total Service".to_string(),
        }
    }
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Column holding the identifier to search for.
    pub identifier_column: String,

    /// Column receiving the located amount.
    pub amount_column: String,

    /// Header cells appended to row 0 before merging (empty = plain mode).
    pub appended_headers: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            identifier_column: "A".to_string(),
            amount_column: "B".to_string(),
            appended_headers: vec![
                "Ratio".to_string(),
                "Shipping cost per item - actual amount".to_string(),
                "Shipping cost - paid by client".to_string(),
                "Shipping cost - gain/ loss".to_string(),
            ],
        }
    }
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TallyError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TallyConfig = serde_json::from_str(
            r#"{ "grouping": { "subtotal_policy": "always" }, "reconcile": { "appended_headers": [] } }"#,
        )
        .unwrap();

        assert_eq!(config.grouping.subtotal_policy, SubtotalPolicy::Always);
        assert_eq!(
            config.grouping.total_column_fallback,
            TotalColumnFallback::ReferenceColumn
        );
        assert_eq!(config.locator.boundary_marker, "Total facture");
        assert_eq!(config.reconcile.identifier_column, "A");
        assert!(config.reconcile.appended_headers.is_empty());
    }

    #[test]
    fn test_from_file_round_trip_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TallyConfig::default();
        config.locator.subtotal_marker = "Subtotal".to_string();
        config.save(&path).unwrap();
        assert_eq!(
            TallyConfig::from_file(&path).unwrap().locator.subtotal_marker,
            "Subtotal"
        );

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            TallyConfig::from_file(&path),
            Err(TallyError::Config(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(TallyConfig::from_file(&missing), Err(TallyError::Io(_))));
    }

    #[test]
    fn test_subtotal_policy() {
        assert!(SubtotalPolicy::PositiveOnly.accepts(dec!(0.01)));
        assert!(!SubtotalPolicy::PositiveOnly.accepts(dec!(0)));
        assert!(!SubtotalPolicy::PositiveOnly.accepts(dec!(-5)));
        assert!(SubtotalPolicy::NonZero.accepts(dec!(-5)));
        assert!(!SubtotalPolicy::NonZero.accepts(dec!(0)));
        assert!(SubtotalPolicy::Always.accepts(dec!(0)));
    }
}
