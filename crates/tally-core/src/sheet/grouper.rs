//! Group rows by a reference column, with separators and subtotals.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::column::column_to_index;
use crate::error::SheetError;
use crate::invoice::rules::amounts::format_fixed;
use crate::models::config::{FinalRowPolicy, GroupingConfig, TotalColumnFallback};
use crate::models::grid::{Cell, Row, SpreadsheetGrid};

/// Number of blank rows inserted between two groups.
pub const SEPARATOR_ROWS: usize = 2;

/// Parameters of one grouping call.
#[derive(Debug, Clone, Default)]
pub struct GroupRequest {
    /// Column whose value defines the groups, e.g. "F".
    pub reference_column: String,
    /// Append a subtotal row after each group.
    pub compute_totals: bool,
    /// Column to sum for subtotals.
    pub total_column: Option<String>,
}

impl GroupRequest {
    pub fn new(reference_column: impl Into<String>) -> Self {
        Self {
            reference_column: reference_column.into(),
            ..Default::default()
        }
    }

    pub fn with_totals(mut self, total_column: Option<&str>) -> Self {
        self.compute_totals = true;
        self.total_column = total_column.map(str::to_string);
        self
    }
}

/// Partitions contiguous runs of equal reference values into groups.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetGrouper {
    config: GroupingConfig,
}

impl SpreadsheetGrouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Group the grid's rows.
    ///
    /// Rows keep their relative order. Groups are separated by
    /// [`SEPARATOR_ROWS`] blank rows; the header row takes part in grouping
    /// like any other row. With totals, each group whose sum the subtotal
    /// policy accepts is followed by a row holding only that sum. Under
    /// [`FinalRowPolicy::Boundary`] the grid's last row is not summed and
    /// the final subtotal lands in front of it.
    pub fn group(
        &self,
        mut grid: SpreadsheetGrid,
        request: &GroupRequest,
    ) -> Result<SpreadsheetGrid, SheetError> {
        let ref_index = column_to_index(&request.reference_column)?;
        let total_index = if request.compute_totals {
            self.resolve_total_column(request, ref_index)?
        } else {
            None
        };

        grid.normalize();
        let width = grid.header_width();
        let sheet_name = std::mem::take(&mut grid.sheet_name);

        let groups = split_groups(grid.into_rows(), ref_index);
        let group_count = groups.len();

        let mut rows = Vec::new();
        let mut subtotals = 0;

        for (i, mut group) in groups.into_iter().enumerate() {
            if i > 0 {
                let separator_width = group.first().map(Vec::len).unwrap_or(width);
                for _ in 0..SEPARATOR_ROWS {
                    rows.push(vec![Cell::text(""); separator_width]);
                }
            }

            let last_row = if i + 1 == group_count
                && total_index.is_some()
                && self.config.final_row == FinalRowPolicy::Boundary
            {
                group.pop()
            } else {
                None
            };

            let subtotal = total_index.and_then(|col| self.subtotal_row(&group, col, width));
            rows.extend(group);
            if let Some(row) = subtotal {
                rows.push(row);
                subtotals += 1;
            }
            rows.extend(last_row);
        }

        debug!(
            "Grouped on column {}: {} groups, {} subtotal rows",
            request.reference_column, group_count, subtotals
        );

        Ok(SpreadsheetGrid::new(sheet_name, rows))
    }

    fn resolve_total_column(
        &self,
        request: &GroupRequest,
        ref_index: usize,
    ) -> Result<Option<usize>, SheetError> {
        let error = match request.total_column.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => match column_to_index(label) {
                Ok(index) => return Ok(Some(index)),
                Err(e) => e,
            },
            None => SheetError::MissingTotalColumn,
        };

        match self.config.total_column_fallback {
            TotalColumnFallback::ReferenceColumn => {
                warn!("{}; summing the reference column instead", error);
                Ok(Some(ref_index))
            }
            TotalColumnFallback::SkipTotals => {
                warn!("{}; grouping without subtotals", error);
                Ok(None)
            }
            TotalColumnFallback::Reject => Err(error),
        }
    }

    /// Subtotal row for a group, if the policy wants one.
    ///
    /// Cells that are not numbers are skipped. A group without any numeric
    /// cell never gets a subtotal.
    fn subtotal_row(&self, group: &[Row], total_index: usize, width: usize) -> Option<Row> {
        let mut sum = Decimal::ZERO;
        let mut counted = 0;

        for value in group.iter().filter_map(|row| row.get(total_index)?.as_decimal()) {
            match sum.checked_add(value) {
                Some(next) => {
                    sum = next;
                    counted += 1;
                }
                None => warn!("Subtotal overflow, skipping value {}", value),
            }
        }

        if counted == 0 || !self.config.subtotal_policy.accepts(sum) {
            return None;
        }

        let mut row = vec![Cell::text(""); width.max(total_index + 1)];
        row[total_index] = Cell::Text(format_fixed(sum));
        Some(row)
    }
}

/// Split rows into maximal runs of equal reference values.
fn split_groups(rows: Vec<Row>, ref_index: usize) -> Vec<Vec<Row>> {
    let mut groups: Vec<Vec<Row>> = Vec::new();
    let mut current: Option<Cell> = None;

    for row in rows {
        let value = row.get(ref_index).cloned().unwrap_or_default();
        match groups.last_mut() {
            Some(group) if current.as_ref() == Some(&value) => group.push(row),
            _ => {
                current = Some(value);
                groups.push(vec![row]);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::SubtotalPolicy;

    fn grouper(final_row: FinalRowPolicy) -> SpreadsheetGrouper {
        SpreadsheetGrouper::new(GroupingConfig {
            final_row,
            ..Default::default()
        })
    }
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[Cell]]) -> SpreadsheetGrid {
        SpreadsheetGrid::new("Sheet1", rows.iter().map(|r| r.to_vec()).collect())
    }

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn column(grid: &SpreadsheetGrid, col: usize) -> Vec<String> {
        grid.rows()
            .iter()
            .map(|r| r.get(col).map(Cell::to_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_separators_between_groups() {
        let input = grid(&[
            &[t("A"), n(1.0)],
            &[t("A"), n(2.0)],
            &[t("B"), n(3.0)],
            &[t("B"), n(4.0)],
            &[t("B"), n(5.0)],
            &[t("C"), n(6.0)],
        ]);

        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A"))
            .unwrap();

        assert_eq!(
            column(&out, 0),
            vec!["A", "A", "", "", "B", "B", "B", "", "", "C"]
        );
        assert_eq!(
            column(&out, 1),
            vec!["1", "2", "", "", "3", "4", "5", "", "", "6"]
        );
        assert_eq!(out.sheet_name, "Sheet1");
    }

    #[test]
    fn test_header_forms_its_own_group() {
        let input = grid(&[&[t("Ref")], &[t("X")], &[t("X")]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("a"))
            .unwrap();
        assert_eq!(column(&out, 0), vec!["Ref", "", "", "X", "X"]);
    }

    #[test]
    fn test_empty_reference_values_group_together() {
        let input = grid(&[&[t("h"), t("Ref")], &[t("1")], &[t("2")], &[t("3"), t("Z")]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("B"))
            .unwrap();
        assert_eq!(column(&out, 0), vec!["h", "", "", "1", "2", "", "", "3"]);
        // Short rows are padded to the header width first.
        assert!(out.rows().iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_subtotals_only_for_positive_sums() {
        let input = grid(&[
            &[t("Ref"), t("Amount")],
            &[t("A"), n(10.0)],
            &[t("A"), t("20.5")],
            &[t("B"), n(-5.0)],
            &[t("B"), n(2.0)],
            &[t("C"), t("1,000.25")],
            &[t("C"), t("n/a")],
        ]);

        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();

        assert_eq!(
            column(&out, 1),
            vec![
                "Amount", "", "", // header group, no numbers
                "10", "20.5", "30.50", "", "", // A
                "-5", "2", "", "", // B sums to -3: no subtotal
                "1,000.25", "1000.25", "n/a", // C, last row closes the group
            ]
        );
        assert_eq!(out.rows()[5], vec![t(""), t("30.50")]);
    }

    #[test]
    fn test_final_row_is_a_boundary_by_default() {
        let input = grid(&[&[t("Ref"), t("Amt")], &[t("X"), n(10.0)], &[t("X"), n(5.0)]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();
        assert_eq!(column(&out, 1), vec!["Amt", "", "", "10", "10.00", "5"]);
        assert_eq!(out.rows()[4], vec![t(""), t("10.00")]);
    }

    #[test]
    fn test_final_row_part_of_group() {
        let input = grid(&[&[t("Ref"), t("Amt")], &[t("X"), n(10.0)], &[t("X"), n(5.0)]]);
        let out = grouper(FinalRowPolicy::PartOfGroup)
            .group(input, &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();
        assert_eq!(column(&out, 1), vec!["Amt", "", "", "10", "5", "15.00"]);
    }

    #[test]
    fn test_single_row_final_group_gets_no_subtotal() {
        let input = grid(&[&[t("Ref"), t("Amt")], &[t("X"), n(4.0)], &[t("Y"), n(9.0)]]);

        let out = SpreadsheetGrouper::default()
            .group(input.clone(), &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();
        assert_eq!(
            column(&out, 1),
            vec!["Amt", "", "", "4", "4.00", "", "", "9"]
        );

        let out = grouper(FinalRowPolicy::PartOfGroup)
            .group(input, &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();
        assert_eq!(
            column(&out, 1),
            vec!["Amt", "", "", "4", "4.00", "", "", "9", "9.00"]
        );
    }

    #[test]
    fn test_final_row_kept_without_totals() {
        let input = grid(&[&[t("Ref")], &[t("X")], &[t("X")]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A"))
            .unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.get(4, 0), &t("X"));
    }

    #[test]
    fn test_separator_width_follows_group_first_row() {
        let input = grid(&[
            &[t("Ref")],
            &[t("A")],
            &[t("B"), t("x"), t("y")],
            &[t("B")],
        ]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A"))
            .unwrap();

        let widths: Vec<usize> = out.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![1, 1, 1, 1, 3, 3, 3, 1]);
        assert_eq!(out.rows()[4], vec![t(""); 3]);
    }

    #[test]
    fn test_missing_total_column_falls_back_to_reference() {
        let input = grid(&[&[t("Qty")], &[n(5.0)], &[n(5.0)], &[n(7.0)]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A").with_totals(None))
            .unwrap();
        assert_eq!(
            column(&out, 0),
            vec!["Qty", "", "", "5", "5", "10.00", "", "", "7"]
        );
    }

    #[test]
    fn test_invalid_total_column_falls_back_to_reference() {
        let input = grid(&[&[t("Qty")], &[n(3.0)], &[n(3.0)], &[n(8.0)]]);
        let out = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("A").with_totals(Some("B2")))
            .unwrap();
        assert_eq!(
            column(&out, 0),
            vec!["Qty", "", "", "3", "3", "6.00", "", "", "8"]
        );
    }

    #[test]
    fn test_skip_totals_fallback() {
        let grouper = SpreadsheetGrouper::new(GroupingConfig {
            total_column_fallback: TotalColumnFallback::SkipTotals,
            ..Default::default()
        });
        let input = grid(&[&[t("Qty")], &[n(3.0)]]);
        let out = grouper
            .group(input, &GroupRequest::new("A").with_totals(Some("")))
            .unwrap();
        assert_eq!(column(&out, 0), vec!["Qty", "", "", "3"]);
    }

    #[test]
    fn test_reject_fallback() {
        let grouper = SpreadsheetGrouper::new(GroupingConfig {
            total_column_fallback: TotalColumnFallback::Reject,
            ..Default::default()
        });
        let input = grid(&[&[t("Qty")], &[n(3.0)]]);

        let err = grouper
            .group(input.clone(), &GroupRequest::new("A").with_totals(None))
            .unwrap_err();
        assert!(matches!(err, SheetError::MissingTotalColumn));

        let err = grouper
            .group(input, &GroupRequest::new("A").with_totals(Some("1")))
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidColumnLabel(_)));
    }

    #[test]
    fn test_always_policy_emits_zero_subtotal() {
        let grouper = SpreadsheetGrouper::new(GroupingConfig {
            subtotal_policy: SubtotalPolicy::Always,
            ..Default::default()
        });
        let input = grid(&[
            &[t("Ref"), t("Amt")],
            &[t("A"), n(1.5)],
            &[t("A"), n(-1.5)],
            &[t("B"), n(1.0)],
        ]);
        let out = grouper
            .group(input, &GroupRequest::new("A").with_totals(Some("B")))
            .unwrap();
        assert_eq!(
            column(&out, 1),
            vec!["Amt", "", "", "1.5", "-1.5", "0.00", "", "", "1"]
        );
    }

    #[test]
    fn test_invalid_reference_column() {
        let input = grid(&[&[t("Ref")]]);
        let err = SpreadsheetGrouper::default()
            .group(input, &GroupRequest::new("F1"))
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidColumnLabel(label) if label == "F1"));
    }

    #[test]
    fn test_empty_grid() {
        let out = SpreadsheetGrouper::default()
            .group(SpreadsheetGrid::default(), &GroupRequest::new("A"))
            .unwrap();
        assert!(out.is_empty());
    }
}
