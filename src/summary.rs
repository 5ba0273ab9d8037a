//! Per-question response distributions and dataset-level overview metrics.
//!
//! These are the reporting companions to classification: frequency counts
//! in descending order for chart rendering, an average for numeric-valued
//! questions, and whole-dataset completion metrics.
//!
//! # Example
//!
//! ```
//! use survey_insight::classify::{classify, ClassifyConfig};
//! use survey_insight::summary::response_distribution;
//! use survey_insight::table::Column;
//!
//! let col = Column::from_labels("Grad", &["Beograd", "Novi Sad", "Beograd", ""]);
//! let dist = response_distribution(&classify(&col, &ClassifyConfig::default()));
//! assert_eq!(dist.frequencies[0].label, "Beograd");
//! assert_eq!(dist.frequencies[0].count, 2);
//! assert_eq!(dist.missing_count, 1);
//! ```

use crate::classify::{ClassifiedColumn, QuestionType};
use u_numflow::stats::mean;

// ── Response distributions ────────────────────────────────────────────

/// One answer value with its frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFrequency {
    /// Canonical answer label.
    pub label: String,
    /// Number of respondents who gave this answer.
    pub count: usize,
    /// Share of non-missing responses, in percent.
    pub percentage: f64,
}

/// Frequency summary of a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDistribution {
    /// Question name.
    pub question: String,
    /// Inferred question type.
    pub question_type: QuestionType,
    /// Non-missing response count.
    pub total_responses: usize,
    /// Missing response count.
    pub missing_count: usize,
    /// Frequencies in descending count order; ties keep first-seen order.
    pub frequencies: Vec<CategoryFrequency>,
    /// Mean of the numeric values, for rating and numeric questions.
    pub mean: Option<f64>,
}

/// Computes the frequency summary for one classified column.
///
/// Counts are over canonical labels, so `Number(4.0)` and `Text("4")`
/// merge into one entry.
pub fn response_distribution(column: &ClassifiedColumn) -> ResponseDistribution {
    let mut order: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for cell in column.cells() {
        if let Some(label) = cell.label() {
            match order.iter().position(|l| l == &label) {
                Some(i) => counts[i] += 1,
                None => {
                    order.push(label);
                    counts.push(1);
                }
            }
        }
    }
    let total_responses: usize = counts.iter().sum();

    let mut frequencies: Vec<CategoryFrequency> = order
        .into_iter()
        .zip(counts)
        .map(|(label, count)| CategoryFrequency {
            label,
            count,
            percentage: if total_responses > 0 {
                count as f64 / total_responses as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    let mean = match column.question_type() {
        QuestionType::Rating | QuestionType::Numeric => {
            let values: Vec<f64> = column
                .cells()
                .iter()
                .filter_map(|c| c.as_number())
                .collect();
            mean(&values)
        }
        _ => None,
    };

    ResponseDistribution {
        question: column.name().to_string(),
        question_type: column.question_type(),
        total_responses,
        missing_count: column.missing_count(),
        frequencies,
        mean,
    }
}

// ── Dataset overview ──────────────────────────────────────────────────

/// Whole-dataset metrics for a classified survey.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    /// Number of respondents (rows).
    pub respondent_count: usize,
    /// Number of questions (columns).
    pub question_count: usize,
    /// Percentage of cells that are non-missing. 100 for an empty dataset.
    pub completion_rate: f64,
    /// Question count per type, in a fixed display order.
    pub type_counts: Vec<(QuestionType, usize)>,
    /// Number of questions eligible for cross-tabulation.
    pub analyzable_count: usize,
}

const TYPE_ORDER: [QuestionType; 6] = [
    QuestionType::Categorical,
    QuestionType::Rating,
    QuestionType::YesNo,
    QuestionType::Numeric,
    QuestionType::Text,
    QuestionType::Identifier,
];

/// Computes dataset-level metrics over a set of classified columns.
pub fn dataset_overview(columns: &[ClassifiedColumn]) -> DatasetOverview {
    let respondent_count = columns.first().map_or(0, |c| c.len());
    let question_count = columns.len();

    let total_cells = respondent_count * question_count;
    let missing_cells: usize = columns.iter().map(|c| c.missing_count()).sum();
    let completion_rate = if total_cells > 0 {
        (total_cells - missing_cells) as f64 / total_cells as f64 * 100.0
    } else {
        100.0
    };

    let type_counts = TYPE_ORDER
        .iter()
        .map(|&t| {
            let n = columns.iter().filter(|c| c.question_type() == t).count();
            (t, n)
        })
        .collect();
    let analyzable_count = columns.iter().filter(|c| c.is_analyzable()).count();

    DatasetOverview {
        respondent_count,
        question_count,
        completion_rate,
        type_counts,
        analyzable_count,
    }
}

/// Filters the columns eligible for relationship analysis, in source order.
pub fn analyzable_questions(columns: &[ClassifiedColumn]) -> Vec<&ClassifiedColumn> {
    columns.iter().filter(|c| c.is_analyzable()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────
