//! Raw survey table: tagged cells, named columns, equal-length invariant.
//!
//! Source data arrives as loosely typed cells — numbers, numbers-as-strings,
//! free text, and assorted missing markers. Each cell is modeled as an
//! explicit [`Cell`] variant at ingestion so everything downstream operates
//! on a closed set, never on runtime coercion.
//!
//! A [`Column`] is one question: the header text plus one cell per
//! respondent. A [`Table`] holds named columns of equal length. Both are
//! immutable once built; the analysis core never mutates them.
//!
//! # Example
//!
//! ```
//! use survey_insight::table::{Cell, Column, Table};
//!
//! let col = Column::new(
//!     "How satisfied were you?",
//!     vec![Cell::number(4.0), Cell::text("5"), Cell::Missing],
//! );
//! assert_eq!(col.len(), 3);
//! assert_eq!(col.missing_count(), 1);
//!
//! let mut table = Table::new();
//! table.add_column(col).unwrap();
//! assert_eq!(table.respondent_count(), 3);
//! ```

use crate::error::SurveyError;

// ── Cell ──────────────────────────────────────────────────────────────

/// A single raw response value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A numeric response. Non-finite values count as missing.
    Number(f64),
    /// A textual response.
    Text(String),
    /// No response.
    Missing,
}

impl Cell {
    /// Creates a numeric cell.
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` if this cell carries no usable value.
    ///
    /// Non-finite numbers and whitespace-only text count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Number(x) => !x.is_finite(),
            Self::Text(s) => s.trim().is_empty(),
            Self::Missing => true,
        }
    }

    /// Returns the numeric view of this cell, if it has one.
    ///
    /// Text cells are parsed tolerantly: surrounding whitespace is ignored
    /// and a decimal comma is accepted ("4,5" parses as 4.5). Parsing never
    /// mutates the cell; a text cell that happens to look numeric stays text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(x) if x.is_finite() => Some(*x),
            Self::Number(_) | Self::Missing => None,
            Self::Text(s) => parse_number(s),
        }
    }

    /// Returns the canonical display label of this cell, or `None` if missing.
    ///
    /// Whole numbers render without a decimal point so that `Number(4.0)`
    /// and `Text("4")` share the label `"4"`; text labels are trimmed.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Number(x) if x.is_finite() => Some(number_label(*x)),
            Self::Number(_) | Self::Missing => None,
            Self::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
        }
    }
}

/// Parses a raw string as a number, tolerating surrounding whitespace and a
/// decimal comma. Returns `None` for anything non-finite.
pub fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    let parsed = t.parse::<f64>().ok().or_else(|| {
        // Locale decimal comma: "4,5" → 4.5. Only when there is exactly one
        // comma and no dot, so thousands separators don't sneak through.
        if t.matches(',').count() == 1 && !t.contains('.') {
            t.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

/// Canonical label for a numeric value: whole numbers without the trailing
/// `.0`, everything else in default `f64` formatting.
pub fn number_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// One survey question: the header text and one cell per respondent.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Creates a column from a question name and raw cells.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Creates a column from raw string labels; empty labels become missing.
    ///
    /// Convenient for programmatic construction and tests. No numeric
    /// tagging happens here — every non-empty label is a text cell.
    pub fn from_labels(name: impl Into<String>, labels: &[&str]) -> Self {
        let cells = labels
            .iter()
            .map(|&s| {
                if s.trim().is_empty() {
                    Cell::Missing
                } else {
                    Cell::text(s)
                }
            })
            .collect();
        Self::new(name, cells)
    }

    /// Returns the question name (header text).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw cells, one per respondent.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the respondent count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Counts cells with no usable value.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// A loaded survey: named columns of equal length.
///
/// Each row is one respondent. Column order is the source order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    respondent_count: usize,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, enforcing the equal-length invariant.
    ///
    /// The first column fixes the respondent count; later columns must
    /// match it.
    pub fn add_column(&mut self, column: Column) -> Result<(), SurveyError> {
        if self.columns.is_empty() {
            self.respondent_count = column.len();
        } else if column.len() != self.respondent_count {
            return Err(SurveyError::IncompatibleColumns {
                expected: self.respondent_count,
                actual: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of respondents (rows).
    pub fn respondent_count(&self) -> usize {
        self.respondent_count
    }

    /// Returns the number of questions (columns).
    pub fn question_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns all columns in source order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column with the given question name.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
