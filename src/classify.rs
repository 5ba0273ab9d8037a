//! Automatic question-type classification.
//!
//! Given one raw [`Column`], [`classify`] infers what kind of survey
//! question it holds: a categorical choice, an ordinal rating scale, a
//! yes/no answer, continuous numeric data, free text, or a near-unique
//! identifier that carries no categorical signal. Classification never
//! fails — unrecognizable data degrades to `text`, unusable data to
//! `identifier` — because a misclassified column is recoverable by a human
//! while a crash is not.
//!
//! The rules overlap, so they are evaluated in a strict priority order and
//! the first match wins (a binary numeric column could satisfy both the
//! yes/no and the rating rule; the order decides).
//!
//! # Example
//!
//! ```
//! use survey_insight::classify::{classify, ClassifyConfig, QuestionType};
//! use survey_insight::table::Column;
//!
//! let col = Column::from_labels("Satisfied?", &["yes", "no", "yes", "no", "yes"]);
//! let classified = classify(&col, &ClassifyConfig::default());
//! assert_eq!(classified.question_type(), QuestionType::YesNo);
//! assert_eq!(classified.categories(), &["yes", "no"]); // first-seen order
//! ```

use crate::table::{number_label, Cell, Column, Table};
use std::collections::HashSet;

// ── QuestionType ──────────────────────────────────────────────────────

/// Semantic question type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// A small fixed set of answer choices, in survey-defined order.
    Categorical,
    /// An ordinal numeric scale (e.g. a 1–5 Likert rating).
    Rating,
    /// A binary answer drawn from a recognized vocabulary pair.
    YesNo,
    /// Continuous or wide-range numeric data.
    Numeric,
    /// Free-form or high-cardinality text.
    Text,
    /// Near-unique per respondent (IDs, timestamps); excluded from analysis.
    Identifier,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::Rating => write!(f, "rating"),
            Self::YesNo => write!(f, "yes_no"),
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
            Self::Identifier => write!(f, "identifier"),
        }
    }
}

// ── ClassifyConfig ────────────────────────────────────────────────────

/// Thresholds for the classification rules.
///
/// Every call takes an explicit config; there are no ambient defaults, so
/// concurrent classifications with different thresholds cannot interfere.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Distinct/non-missing ratio at or above which a column is an
    /// identifier. Default: 0.95.
    pub uniqueness_threshold: f64,
    /// Minimum non-missing count before the identifier rule applies.
    /// Default: 10.
    pub min_sample_for_identifier: usize,
    /// Recognized binary answer pairs, matched case-insensitively.
    /// Injected rather than hard-coded so other languages slot in.
    pub yes_no_vocabulary: Vec<(String, String)>,
    /// Inclusive range for the distinct-value count of a rating scale.
    /// Default: 2–10.
    pub rating_distinct_range: (usize, usize),
    /// Inclusive bound every rating value must fall within. Default: 1–10.
    pub rating_value_bound: (f64, f64),
    /// Maximum distinct values for a categorical column. Default: 20.
    pub categorical_max_distinct: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            uniqueness_threshold: 0.95,
            min_sample_for_identifier: 10,
            yes_no_vocabulary: vec![
                ("yes".into(), "no".into()),
                ("true".into(), "false".into()),
                ("da".into(), "ne".into()),
            ],
            rating_distinct_range: (2, 10),
            rating_value_bound: (1.0, 10.0),
            categorical_max_distinct: 20,
        }
    }
}

impl ClassifyConfig {
    /// Adds a binary answer pair to the vocabulary.
    pub fn with_yes_no_pair(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.yes_no_vocabulary.push((a.into(), b.into()));
        self
    }
}

// ── ClassifiedColumn ──────────────────────────────────────────────────

/// A column plus its inferred type and derived metadata.
///
/// Immutable once created; reclassifying means producing a new value.
/// `categories` is populated only for the category-bearing types
/// (categorical, rating, yes/no) and is empty otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedColumn {
    column: Column,
    question_type: QuestionType,
    categories: Vec<String>,
    missing_count: usize,
}

impl ClassifiedColumn {
    /// Returns the question name (header text).
    pub fn name(&self) -> &str {
        self.column.name()
    }

    /// Returns the inferred question type.
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Returns the ordered category labels.
    ///
    /// First-seen order for categorical and yes/no columns, ascending
    /// numeric order for ratings. Empty for the other types.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns the number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.missing_count
    }

    /// Returns the respondent count.
    pub fn len(&self) -> usize {
        self.column.len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    /// Returns the underlying raw cells.
    pub fn cells(&self) -> &[Cell] {
        self.column.cells()
    }

    /// Returns `true` for the types that can enter a cross-tabulation.
    pub fn is_analyzable(&self) -> bool {
        matches!(
            self.question_type,
            QuestionType::Categorical | QuestionType::Rating | QuestionType::YesNo
        )
    }

    /// Maps a cell to its index in `categories`, or `None` if the cell is
    /// missing, unmapped, or the column type carries no categories.
    ///
    /// Rating columns match on the numeric value (so `Number(4.0)` and
    /// `Text("4")` land in the same category); the others match on the
    /// canonical label.
    pub fn category_index(&self, cell: &Cell) -> Option<usize> {
        let label = match self.question_type {
            QuestionType::Rating => number_label(cell.as_number()?),
            QuestionType::Categorical | QuestionType::YesNo => cell.label()?,
            _ => return None,
        };
        self.categories.iter().position(|c| c == &label)
    }
}

// ── Classification ────────────────────────────────────────────────────

/// Classifies a raw column, never failing.
///
/// Rules are tried in priority order: identifier, yes/no, rating, numeric,
/// categorical, text. An all-missing column classifies as `identifier`
/// with empty categories and `missing_count` equal to the row count.
///
/// ```
/// use survey_insight::classify::{classify, ClassifyConfig, QuestionType};
/// use survey_insight::table::Column;
///
/// let col = Column::from_labels("Rate 1-5", &["1", "2", "3", "4", "5", "3"]);
/// let c = classify(&col, &ClassifyConfig::default());
/// assert_eq!(c.question_type(), QuestionType::Rating);
/// assert_eq!(c.categories(), &["1", "2", "3", "4", "5"]);
/// ```
pub fn classify(column: &Column, config: &ClassifyConfig) -> ClassifiedColumn {
    let n = column.len();
    let missing_count = column.missing_count();
    let valid_count = n - missing_count;

    if valid_count == 0 {
        // Nothing to classify on; the most conservative type wins.
        return ClassifiedColumn {
            column: column.clone(),
            question_type: QuestionType::Identifier,
            categories: Vec::new(),
            missing_count,
        };
    }

    // Distinct labels in first-seen order.
    let mut seen: HashSet<String> = HashSet::new();
    let mut distinct: Vec<String> = Vec::new();
    for cell in column.cells() {
        if let Some(label) = cell.label() {
            if seen.insert(label.clone()) {
                distinct.push(label);
            }
        }
    }

    // Rule 1: identifier — near-unique columns would explode a
    // contingency table and carry no categorical signal.
    let uniqueness = distinct.len() as f64 / valid_count as f64;
    if valid_count >= config.min_sample_for_identifier
        && uniqueness >= config.uniqueness_threshold
    {
        return make(column, QuestionType::Identifier, Vec::new(), missing_count);
    }

    // Rule 2: yes/no — exactly two distinct values forming a recognized
    // pair. Checked before rating, so a vocabulary pair like "1"/"2" can
    // deliberately override the rating rule.
    if distinct.len() == 2 && is_vocabulary_pair(&distinct[0], &distinct[1], config) {
        return make(column, QuestionType::YesNo, distinct, missing_count);
    }

    // Rules 3 and 4 require every non-missing value to have a numeric
    // view. A column where only some values parse falls through — one
    // stray number must not drag a text column into `numeric`.
    let numbers: Option<Vec<f64>> = column
        .cells()
        .iter()
        .filter(|c| !c.is_missing())
        .map(|c| c.as_number())
        .collect();

    if let Some(numbers) = numbers {
        let mut values = numbers;
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        // Rule 3: rating — a small whole-number scale inside the bound.
        let (lo, hi) = config.rating_distinct_range;
        let (min_v, max_v) = config.rating_value_bound;
        let is_scale = values.len() >= lo
            && values.len() <= hi
            && values.iter().all(|v| v.fract() == 0.0)
            && values.first().is_some_and(|&v| v >= min_v)
            && values.last().is_some_and(|&v| v <= max_v);
        if is_scale {
            // Ascending numeric order is semantically required for an
            // ordinal scale; never alphabetical.
            let categories = values.iter().map(|&v| number_label(v)).collect();
            return make(column, QuestionType::Rating, categories, missing_count);
        }

        // Rule 4: numeric — parses throughout but is not a scale.
        return make(column, QuestionType::Numeric, Vec::new(), missing_count);
    }

    // Rule 5: categorical — few enough distinct values, in first-seen
    // order. A single distinct value is degenerate but valid; the
    // analyzer reports the missing variance, not the classifier.
    if distinct.len() <= config.categorical_max_distinct {
        return make(column, QuestionType::Categorical, distinct, missing_count);
    }

    // Rule 6: fallback.
    make(column, QuestionType::Text, Vec::new(), missing_count)
}

/// Classifies every column of a table in source order.
pub fn classify_table(table: &Table, config: &ClassifyConfig) -> Vec<ClassifiedColumn> {
    table
        .columns()
        .iter()
        .map(|col| classify(col, config))
        .collect()
}

fn make(
    column: &Column,
    question_type: QuestionType,
    categories: Vec<String>,
    missing_count: usize,
) -> ClassifiedColumn {
    ClassifiedColumn {
        column: column.clone(),
        question_type,
        categories,
        missing_count,
    }
}

/// Case-insensitive check that `{a, b}` is one of the configured pairs.
fn is_vocabulary_pair(a: &str, b: &str, config: &ClassifyConfig) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    config.yes_no_vocabulary.iter().any(|(p, q)| {
        let p = p.to_lowercase();
        let q = q.to_lowercase();
        (a == p && b == q) || (a == q && b == p)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn defaults() -> ClassifyConfig {
        ClassifyConfig::default()
    }

    // ── Yes/No ───────────────────────────────────────────────────

    #[test]
    fn yes_no_first_seen_order() {
        let col = Column::from_labels("q", &["yes", "no", "yes", "no", "yes"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::YesNo);
        assert_eq!(c.categories(), &["yes", "no"]);
        assert_eq!(c.missing_count(), 0);
    }

    #[test]
    fn serbian_pair_recognized() {
        let col = Column::from_labels("q", &["Da", "Ne", "Da", "Da", "Ne"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::YesNo);
        // Original casing survives; matching was case-normalized.
        assert_eq!(c.categories(), &["Da", "Ne"]);
    }

    #[test]
    fn unknown_binary_pair_is_categorical() {
        let col = Column::from_labels("q", &["left", "right", "left", "right"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Categorical);
    }

    #[test]
    fn injected_pair_overrides_rating() {
        // {1, 2} is a rating by default; adding it to the vocabulary flips
        // the priority, which is the documented resolution of the
        // rating-vs-binary ambiguity.
        let col = Column::from_labels("q", &["1", "2", "1", "2", "1"]);
        assert_eq!(
            classify(&col, &defaults()).question_type(),
            QuestionType::Rating
        );
        let config = defaults().with_yes_no_pair("1", "2");
        assert_eq!(
            classify(&col, &config).question_type(),
            QuestionType::YesNo
        );
    }

    // ── Rating ───────────────────────────────────────────────────

    #[test]
    fn likert_scale_ascending() {
        let col =
            Column::from_labels("q", &["1", "2", "3", "4", "5", "1", "2", "3", "4", "5"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Rating);
        assert_eq!(c.categories(), &["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn rating_sorted_numerically_not_alphabetically() {
        // Alphabetical order would put "10" before "2".
        let labels = ["7", "10", "2", "9", "2", "7", "10", "9"];
        let c = classify(&Column::from_labels("q", &labels), &defaults());
        assert_eq!(c.question_type(), QuestionType::Rating);
        assert_eq!(c.categories(), &["2", "7", "9", "10"]);
    }

    #[test]
    fn rating_accepts_number_cells() {
        let cells = vec![
            Cell::number(1.0),
            Cell::number(2.0),
            Cell::number(3.0),
            Cell::number(2.0),
        ];
        let c = classify(&Column::new("q", cells), &defaults());
        assert_eq!(c.question_type(), QuestionType::Rating);
        assert_eq!(c.categories(), &["1", "2", "3"]);
    }

    #[test]
    fn fractional_values_are_numeric_not_rating() {
        let col = Column::from_labels("q", &["1.5", "2.5", "3.5", "1.5"]);
        assert_eq!(
            classify(&col, &defaults()).question_type(),
            QuestionType::Numeric
        );
    }

    #[test]
    fn out_of_bound_integers_are_numeric() {
        let col = Column::from_labels("q", &["10", "20", "30", "20", "10"]);
        assert_eq!(
            classify(&col, &defaults()).question_type(),
            QuestionType::Numeric
        );
    }

    #[test]
    fn decimal_comma_parses_in_numeric_rules() {
        let col = Column::from_labels("q", &[" 1,5 ", "2,5", "3,5", "2,5"]);
        assert_eq!(
            classify(&col, &defaults()).question_type(),
            QuestionType::Numeric
        );
    }

    #[test]
    fn partial_parse_falls_through_to_categorical() {
        // Strict policy: one unparseable value disqualifies the numeric
        // rules; the column classifies on its labels instead.
        let col = Column::from_labels("q", &["1", "2", "ne znam", "1", "2"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Categorical);
        assert_eq!(c.categories(), &["1", "2", "ne znam"]);
    }

    // ── Identifier ───────────────────────────────────────────────

    #[test]
    fn unique_ids_are_identifier() {
        let labels: Vec<String> = (1..=100).map(|i| format!("R{i:03}")).collect();
        let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let c = classify(&Column::from_labels("id", &refs), &defaults());
        assert_eq!(c.question_type(), QuestionType::Identifier);
        assert!(c.categories().is_empty());
    }

    #[test]
    fn identifier_needs_min_sample() {
        // 5 unique values but below the minimum sample: not an identifier.
        let col = Column::from_labels("q", &["a", "b", "c", "d", "e"]);
        assert_eq!(
            classify(&col, &defaults()).question_type(),
            QuestionType::Categorical
        );
    }

    #[test]
    fn uniqueness_just_below_threshold() {
        // 10 valid, 9 distinct → 0.9 < 0.95: categorical.
        let labels = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "a"];
        let c = classify(&Column::from_labels("q", &labels), &defaults());
        assert_eq!(c.question_type(), QuestionType::Categorical);
    }

    #[test]
    fn all_missing_is_identifier() {
        let col = Column::new("q", vec![Cell::Missing; 7]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Identifier);
        assert!(c.categories().is_empty());
        assert_eq!(c.missing_count(), 7);
    }

    #[test]
    fn empty_column_is_identifier() {
        let c = classify(&Column::new("q", Vec::new()), &defaults());
        assert_eq!(c.question_type(), QuestionType::Identifier);
        assert_eq!(c.missing_count(), 0);
    }

    // ── Categorical / text ───────────────────────────────────────

    #[test]
    fn single_distinct_value_is_categorical() {
        let col = Column::from_labels("q", &["Grad", "Grad", "Grad"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Categorical);
        assert_eq!(c.categories(), &["Grad"]);
    }

    #[test]
    fn first_seen_order_preserved() {
        // Pre-ordered survey scales must not be re-sorted.
        let labels = ["Strongly disagree", "Disagree", "Agree", "Strongly agree",
                      "Disagree", "Agree"];
        let c = classify(&Column::from_labels("q", &labels), &defaults());
        assert_eq!(
            c.categories(),
            &["Strongly disagree", "Disagree", "Agree", "Strongly agree"]
        );
    }

    #[test]
    fn high_cardinality_text_fallback() {
        // 30 distinct free-text answers over 40 rows: too many for
        // categorical, not unique enough for identifier.
        let labels: Vec<String> = (0..40).map(|i| format!("answer {}", i % 30)).collect();
        let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let c = classify(&Column::from_labels("q", &refs), &defaults());
        assert_eq!(c.question_type(), QuestionType::Text);
        assert!(c.categories().is_empty());
    }

    #[test]
    fn missing_cells_do_not_form_categories() {
        let col = Column::from_labels("q", &["a", "", "b", "", "a"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.categories(), &["a", "b"]);
        assert_eq!(c.missing_count(), 2);
    }

    // ── category_index ───────────────────────────────────────────

    #[test]
    fn category_index_rating_matches_numerically() {
        let col = Column::from_labels("q", &["1", "2", "3", "2"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.category_index(&Cell::number(2.0)), Some(1));
        assert_eq!(c.category_index(&Cell::text(" 3 ")), Some(2));
        assert_eq!(c.category_index(&Cell::text("7")), None);
        assert_eq!(c.category_index(&Cell::Missing), None);
    }

    #[test]
    fn category_index_none_for_unanalyzable_types() {
        let col = Column::from_labels("q", &["1.5", "2.5", "3.5"]);
        let c = classify(&col, &defaults());
        assert_eq!(c.question_type(), QuestionType::Numeric);
        assert_eq!(c.category_index(&Cell::number(1.5)), None);
        assert!(!c.is_analyzable());
    }

    // ── classify_table / determinism ─────────────────────────────

    #[test]
    fn classify_table_in_source_order() {
        let mut table = Table::new();
        table
            .add_column(Column::from_labels("a", &["yes", "no", "yes"]))
            .unwrap();
        table
            .add_column(Column::from_labels("b", &["1", "2", "3"]))
            .unwrap();
        let classified = classify_table(&table, &defaults());
        assert_eq!(classified[0].question_type(), QuestionType::YesNo);
        assert_eq!(classified[1].question_type(), QuestionType::Rating);
    }

    #[test]
    fn classification_is_deterministic() {
        let col = Column::from_labels("q", &["a", "b", "c", "a", "", "b"]);
        let first = classify(&col, &defaults());
        let second = classify(&col, &defaults());
        assert_eq!(first, second);
    }
}
