//! Cross-variable relationship analysis.
//!
//! [`analyze`] runs a chi-square test of independence over the contingency
//! table of two classified columns and packages the outcome as an
//! immutable [`RelationshipResult`]: statistic, degrees of freedom,
//! p-value, Cramér's V effect size, a tiered [`Significance`] level, and a
//! deterministic plain-language verdict. When a 2×2 table trips the
//! low-expected-count warning, the result additionally carries Fisher's
//! exact p-value.
//!
//! # Example
//!
//! ```
//! use survey_insight::analyze::{analyze, AnalyzeConfig};
//! use survey_insight::classify::{classify, ClassifyConfig};
//! use survey_insight::table::Column;
//!
//! let cfg = ClassifyConfig::default();
//! let groups: Vec<&str> = (0..40).map(|i| if i % 2 == 0 { "X" } else { "Y" }).collect();
//! let answers: Vec<&str> = (0..40).map(|i| if i % 2 == 0 { "da" } else { "ne" }).collect();
//! let a = classify(&Column::from_labels("grupa", &groups), &cfg);
//! let b = classify(&Column::from_labels("odgovor", &answers), &cfg);
//! let result = analyze(&a, &b, &AnalyzeConfig::default()).unwrap();
//! assert!(result.significant); // perfectly dependent columns
//! ```

use crate::classify::ClassifiedColumn;
use crate::crosstab::ContingencyTable;
use crate::error::SurveyError;
use u_analytics::testing::fisher_exact_test;
use u_numflow::matrix::Matrix;
use u_numflow::special::chi_squared_cdf;

// ── Config ────────────────────────────────────────────────────────────

/// Tuning knobs for the relationship analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Significance cutoff for the `significant` flag. Default: 0.05.
    pub alpha: f64,
    /// Minimum complete pairs before a test is attempted. Default: 5.
    pub min_paired_observations: usize,
    /// Expected-count floor below which the chi-square approximation is
    /// flagged as unreliable. Default: 5.0.
    pub low_expected_threshold: f64,
    /// Run Fisher's exact test on flagged 2×2 tables. Default: true.
    pub fisher_for_2x2: bool,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_paired_observations: 5,
            low_expected_threshold: 5.0,
            fisher_for_2x2: true,
        }
    }
}

impl AnalyzeConfig {
    /// Sets the significance cutoff.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the minimum number of complete pairs.
    pub fn with_min_paired_observations(mut self, min: usize) -> Self {
        self.min_paired_observations = min;
        self
    }
}

// ── Significance tiers ────────────────────────────────────────────────

/// Tiered interpretation of a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Significance {
    /// p < 0.001.
    VeryStrong,
    /// p < 0.01.
    Strong,
    /// p < 0.05.
    Significant,
    /// p < 0.1.
    MarginalTrend,
    /// p ≥ 0.1.
    None,
}

impl Significance {
    /// Maps a p-value to its tier.
    pub fn from_p(p: f64) -> Self {
        if p < 0.001 {
            Self::VeryStrong
        } else if p < 0.01 {
            Self::Strong
        } else if p < 0.05 {
            Self::Significant
        } else if p < 0.1 {
            Self::MarginalTrend
        } else {
            Self::None
        }
    }

    /// Full human-readable description of the tier.
    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryStrong => "Very strong statistical relationship (p < 0.001)",
            Self::Strong => "Strong statistical relationship (p < 0.01)",
            Self::Significant => "Statistically significant relationship (p < 0.05)",
            Self::MarginalTrend => "Marginally significant trend (p < 0.1)",
            Self::None => "No significant statistical relationship found",
        }
    }

    /// Short phrase used when composing a verdict sentence.
    fn phrase(&self) -> &'static str {
        match self {
            Self::VeryStrong => "Very strong statistical relationship",
            Self::Strong => "Strong statistical relationship",
            Self::Significant => "Statistically significant relationship",
            Self::MarginalTrend => "Marginally significant trend",
            Self::None => "No significant statistical relationship found",
        }
    }
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Outcome of a chi-square independence test over two questions.
///
/// Derived entirely from the contingency table; never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct RelationshipResult {
    /// Name of the first (row) question.
    pub question_a: String,
    /// Name of the second (column) question.
    pub question_b: String,
    /// The observed contingency table (pruned of empty categories).
    pub table: ContingencyTable,
    /// Expected counts under independence, same shape as the table.
    pub expected: Matrix,
    /// Chi-square statistic.
    pub statistic: f64,
    /// Degrees of freedom, `(rows - 1) * (cols - 1)`.
    pub degrees_of_freedom: usize,
    /// Right-tail p-value, clamped to `[0, 1]`.
    pub p_value: f64,
    /// Whether `p_value < alpha`.
    pub significant: bool,
    /// Tiered interpretation of the p-value.
    pub significance: Significance,
    /// Cramér's V effect size in `[0, 1]`.
    pub cramers_v: f64,
    /// Whether any expected count falls below the configured floor.
    pub low_expected_count: bool,
    /// Fisher's exact two-tailed p-value, present only for a flagged 2×2
    /// table when the fallback is enabled.
    pub fisher_p_value: Option<f64>,
    /// Deterministic plain-language summary.
    pub verdict: String,
}

// ── Analysis ──────────────────────────────────────────────────────────

/// Tests two classified columns for statistical dependence.
///
/// # Errors
///
/// - [`SurveyError::NotAnalyzable`] if either column is not a
///   categorical-like type.
/// - [`SurveyError::IncompatibleColumns`] if the columns differ in length.
/// - [`SurveyError::InsufficientData`] if fewer than
///   `min_paired_observations` complete pairs remain, or the pruned table
///   has fewer than two rows or columns (no variance to test).
/// - [`SurveyError::NonFiniteStatistic`] if the statistic comes out
///   non-finite; no p-value is fabricated.
pub fn analyze(
    a: &ClassifiedColumn,
    b: &ClassifiedColumn,
    config: &AnalyzeConfig,
) -> Result<RelationshipResult, SurveyError> {
    let table = ContingencyTable::from_pair(a, b)?;

    let total = table.total() as usize;
    if total < config.min_paired_observations {
        return Err(SurveyError::InsufficientData {
            min_required: config.min_paired_observations,
            actual: total,
        });
    }
    let min_dim = table.rows().min(table.cols());
    if min_dim < 2 {
        // A 1×k table has zero degrees of freedom: nothing to test.
        return Err(SurveyError::InsufficientData {
            min_required: 2,
            actual: min_dim,
        });
    }

    let expected = table.expected();
    let statistic = chi_squared_statistic(table.counts(), &expected);
    if !statistic.is_finite() {
        return Err(SurveyError::NonFiniteStatistic);
    }

    let degrees_of_freedom = (table.rows() - 1) * (table.cols() - 1);
    let p_value =
        (1.0 - chi_squared_cdf(statistic, degrees_of_freedom as f64)).clamp(0.0, 1.0);
    let significance = Significance::from_p(p_value);
    let significant = p_value < config.alpha;
    let cramers_v = cramers_v(statistic, table.total(), min_dim);

    let low_expected_count = table
        .min_expected()
        .is_some_and(|e| e < config.low_expected_threshold);
    let fisher_p_value = if low_expected_count
        && config.fisher_for_2x2
        && table.rows() == 2
        && table.cols() == 2
    {
        fisher_exact_test(
            table.count(0, 0),
            table.count(0, 1),
            table.count(1, 0),
            table.count(1, 1),
        )
        .map(|t| t.p_value)
    } else {
        None
    };

    let verdict = format!(
        "{} between '{}' and '{}' (χ² = {:.3}, df = {}, p = {:.4})",
        significance.phrase(),
        table.row_question(),
        table.col_question(),
        statistic,
        degrees_of_freedom,
        p_value,
    );

    Ok(RelationshipResult {
        question_a: table.row_question().to_string(),
        question_b: table.col_question().to_string(),
        table,
        expected,
        statistic,
        degrees_of_freedom,
        p_value,
        significant,
        significance,
        cramers_v,
        low_expected_count,
        fisher_p_value,
        verdict,
    })
}

/// Sum of `(observed - expected)^2 / expected` over all cells.
///
/// A cell whose expected count is zero (or negative, which cannot arise
/// from real marginals) contributes exactly 0 to the statistic instead of
/// dividing by zero. Pruned tables never hit this branch, but the policy
/// is part of the statistic's contract, not an incidental guard.
pub fn chi_squared_statistic(observed: &[Vec<u64>], expected: &Matrix) -> f64 {
    let mut sum = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &o) in row.iter().enumerate() {
            let e = expected.get(i, j);
            if e > 0.0 {
                let d = o as f64 - e;
                sum += d * d / e;
            }
        }
    }
    sum
}

/// Cramér's V: `sqrt(chi2 / (n * (min_dim - 1)))`.
fn cramers_v(statistic: f64, n: u64, min_dim: usize) -> f64 {
    let denom = n as f64 * (min_dim - 1) as f64;
    if denom <= 0.0 {
        return 0.0;
    }
    (statistic / denom).sqrt().clamp(0.0, 1.0)
}

// ── Tests ─────────────────────────────────────────────────────────────
