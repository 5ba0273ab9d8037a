//! Contingency tables over pairs of classified columns.
//!
//! A [`ContingencyTable`] counts co-occurrences of the category pairs of
//! two analyzable columns. Respondents missing either answer are dropped
//! pairwise, and categories that end up with an all-zero row or column are
//! pruned, so every marginal total of the finished table is positive.
//!
//! # Example
//!
//! ```
//! use survey_insight::classify::{classify, ClassifyConfig};
//! use survey_insight::crosstab::ContingencyTable;
//! use survey_insight::table::Column;
//!
//! let config = ClassifyConfig::default();
//! let a = classify(&Column::from_labels("Pol", &["M", "Z", "M", "Z"]), &config);
//! let b = classify(&Column::from_labels("Odgovor", &["da", "ne", "da", "da"]), &config);
//! let table = ContingencyTable::from_pair(&a, &b).unwrap();
//! assert_eq!(table.total(), 4);
//! assert_eq!(table.count(0, 0), 2); // M × da
//! ```

use crate::classify::ClassifiedColumn;
use crate::error::SurveyError;
use u_numflow::matrix::Matrix;

/// Observed co-occurrence counts for two categorical-like columns.
///
/// Rows follow the first column's category order, columns the second's,
/// with all-zero rows and columns removed. The grid can therefore be
/// smaller than the full category product when some combinations never
/// occur among the paired respondents.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    row_question: String,
    col_question: String,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    counts: Vec<Vec<u64>>,
    total: u64,
}

impl ContingencyTable {
    /// Builds the table from two classified columns.
    ///
    /// # Errors
    ///
    /// [`SurveyError::NotAnalyzable`] if either column's type carries no
    /// categories, [`SurveyError::IncompatibleColumns`] if the columns
    /// have different lengths.
    pub fn from_pair(
        rows: &ClassifiedColumn,
        cols: &ClassifiedColumn,
    ) -> Result<Self, SurveyError> {
        for col in [rows, cols] {
            if !col.is_analyzable() {
                return Err(SurveyError::NotAnalyzable {
                    name: col.name().to_string(),
                    question_type: col.question_type().to_string(),
                });
            }
        }
        if rows.len() != cols.len() {
            return Err(SurveyError::IncompatibleColumns {
                expected: rows.len(),
                actual: cols.len(),
            });
        }

        // Full category grid first; pairwise deletion of incomplete rows.
        let mut counts = vec![vec![0u64; cols.categories().len()]; rows.categories().len()];
        let mut total = 0u64;
        for (a, b) in rows.cells().iter().zip(cols.cells()) {
            if let (Some(i), Some(j)) = (rows.category_index(a), cols.category_index(b)) {
                counts[i][j] += 1;
                total += 1;
            }
        }

        let mut table = Self {
            row_question: rows.name().to_string(),
            col_question: cols.name().to_string(),
            row_labels: rows.categories().to_vec(),
            col_labels: cols.categories().to_vec(),
            counts,
            total,
        };
        table.prune_empty();
        Ok(table)
    }

    /// Drops all-zero rows and columns, preserving label order.
    ///
    /// After pruning, every marginal total is positive, so no expected
    /// count of a non-degenerate table can be zero.
    fn prune_empty(&mut self) {
        let keep_rows: Vec<usize> = (0..self.counts.len())
            .filter(|&i| self.counts[i].iter().any(|&c| c > 0))
            .collect();
        let n_cols = self.col_labels.len();
        let keep_cols: Vec<usize> = (0..n_cols)
            .filter(|&j| keep_rows.iter().any(|&i| self.counts[i][j] > 0))
            .collect();

        self.counts = keep_rows
            .iter()
            .map(|&i| keep_cols.iter().map(|&j| self.counts[i][j]).collect())
            .collect();
        self.row_labels = keep_rows
            .iter()
            .map(|&i| self.row_labels[i].clone())
            .collect();
        self.col_labels = keep_cols
            .iter()
            .map(|&j| self.col_labels[j].clone())
            .collect();
    }

    /// Name of the question forming the rows.
    pub fn row_question(&self) -> &str {
        &self.row_question
    }

    /// Name of the question forming the columns.
    pub fn col_question(&self) -> &str {
        &self.col_question
    }

    /// Row category labels, in the source column's order.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column category labels, in the source column's order.
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Number of rows after pruning.
    pub fn rows(&self) -> usize {
        self.counts.len()
    }

    /// Number of columns after pruning.
    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Observed count for cell `(row, col)`.
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row][col]
    }

    /// The full observed grid.
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Number of respondents who answered both questions.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Per-row marginal totals.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Per-column marginal totals.
    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Row-normalized view: each cell as a percentage of its row total.
    ///
    /// The chart-friendly form of the table ("of the respondents who
    /// answered M, 67% said da"). Rows always sum to 100.
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        let row_totals = self.row_totals();
        self.counts
            .iter()
            .zip(&row_totals)
            .map(|(row, &total)| {
                row.iter()
                    .map(|&c| c as f64 / total as f64 * 100.0)
                    .collect()
            })
            .collect()
    }

    /// Expected counts under independence: `row_total * col_total / total`.
    ///
    /// Returns an empty matrix for an empty table.
    pub fn expected(&self) -> Matrix {
        if self.total == 0 {
            return Matrix::zeros(0, 0);
        }
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let n = self.total as f64;
        let grid: Vec<Vec<f64>> = row_totals
            .iter()
            .map(|&r| {
                col_totals
                    .iter()
                    .map(|&c| r as f64 * c as f64 / n)
                    .collect()
            })
            .collect();
        let refs: Vec<&[f64]> = grid.iter().map(|row| row.as_slice()).collect();
        Matrix::from_rows(&refs)
    }

    /// Smallest expected count, or `None` for an empty table.
    pub fn min_expected(&self) -> Option<f64> {
        let expected = self.expected();
        let mut min: Option<f64> = None;
        for i in 0..expected.rows() {
            for j in 0..expected.cols() {
                let e = expected.get(i, j);
                min = Some(match min {
                    Some(m) if m <= e => m,
                    _ => e,
                });
            }
        }
        min
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ClassifyConfig};
    use crate::table::{Cell, Column};

    fn classified(name: &str, labels: &[&str]) -> ClassifiedColumn {
        classify(&Column::from_labels(name, labels), &ClassifyConfig::default())
    }

    #[test]
    fn counts_and_marginals() {
        let a = classified("pol", &["M", "Z", "M", "Z", "M", "Z"]);
        let b = classified("odg", &["da", "ne", "da", "da", "ne", "ne"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        assert_eq!(t.row_labels(), &["M", "Z"]);
        assert_eq!(t.col_labels(), &["da", "ne"]);
        assert_eq!(t.counts(), &[vec![2, 1], vec![1, 2]]);
        assert_eq!(t.total(), 6);
        assert_eq!(t.row_totals(), vec![3, 3]);
        assert_eq!(t.col_totals(), vec![3, 3]);
    }

    #[test]
    fn pairwise_deletion_of_missing() {
        let a = classified("a", &["x", "", "x", "y", "y"]);
        let b = classified("b", &["p", "p", "", "q", "q"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        // Rows 2 and 3 each miss one side; only 3 complete pairs remain.
        assert_eq!(t.total(), 3);
        let cell_sum: u64 = t.counts().iter().flatten().sum();
        assert_eq!(cell_sum, t.total());
    }

    #[test]
    fn prunes_empty_rows_and_columns() {
        // "c" only co-occurs with a missing partner, so its row vanishes.
        let a = classified("a", &["a", "b", "c", "a", "b"]);
        let b = classified("b", &["p", "q", "", "p", "q"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        assert_eq!(t.row_labels(), &["a", "b"]);
        assert_eq!(t.col_labels(), &["p", "q"]);
        assert!(t.row_totals().iter().all(|&r| r > 0));
        assert!(t.col_totals().iter().all(|&c| c > 0));
    }

    #[test]
    fn expected_counts_under_independence() {
        let a = classified("a", &["x", "x", "x", "y", "y", "y"]);
        let b = classified("b", &["p", "p", "q", "p", "p", "q"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        let e = t.expected();
        // Row totals 3/3, col totals 4/2, n=6.
        assert!((e.get(0, 0) - 2.0).abs() < 1e-12);
        assert!((e.get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(t.min_expected(), Some(1.0));
    }

    #[test]
    fn row_percentages_sum_to_hundred() {
        let a = classified("a", &["x", "x", "x", "y", "y", "y"]);
        let b = classified("b", &["p", "p", "q", "p", "q", "q"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        let pct = t.row_percentages();
        assert!((pct[0][0] - 2.0 / 3.0 * 100.0).abs() < 1e-12);
        for row in &pct {
            let sum: f64 = row.iter().sum();
            assert!((sum - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_non_analyzable_column() {
        let a = classified("a", &["1.5", "2.5", "3.5"]); // numeric
        let b = classified("b", &["x", "y", "x"]);
        let err = ContingencyTable::from_pair(&a, &b).unwrap_err();
        assert!(matches!(err, SurveyError::NotAnalyzable { .. }));
    }

    #[test]
    fn rejects_length_mismatch() {
        let a = classified("a", &["x", "y", "x"]);
        let b = classified("b", &["p", "q"]);
        let err = ContingencyTable::from_pair(&a, &b).unwrap_err();
        assert_eq!(
            err,
            SurveyError::IncompatibleColumns {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn all_missing_pairs_yield_empty_table() {
        let a = classify(
            &Column::new("a", vec![Cell::Missing, Cell::text("x"), Cell::text("y")]),
            &ClassifyConfig::default(),
        );
        let b = classify(
            &Column::new("b", vec![Cell::text("p"), Cell::Missing, Cell::Missing]),
            &ClassifyConfig::default(),
        );
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        assert_eq!(t.total(), 0);
        assert_eq!(t.rows(), 0);
        assert_eq!(t.cols(), 0);
        assert_eq!(t.min_expected(), None);
    }

    #[test]
    fn rating_rows_use_numeric_order() {
        let a = classified("skala", &["3", "1", "2", "3", "1", "2"]);
        let b = classified("odg", &["da", "ne", "da", "da", "ne", "ne"]);
        let t = ContingencyTable::from_pair(&a, &b).unwrap();
        assert_eq!(t.row_labels(), &["1", "2", "3"]);
    }
}
