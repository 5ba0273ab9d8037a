//! Error types for survey-insight.

use std::fmt;

/// All errors produced by survey-insight operations.
///
/// Classification never fails; errors come from data loading and from the
/// relationship analyzer's input contracts.
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyError {
    /// CSV parsing failed.
    CsvParse { line: usize, message: String },
    /// The two columns passed to `analyze` have different lengths.
    IncompatibleColumns { expected: usize, actual: usize },
    /// Too few paired observations, or no variance to test.
    InsufficientData { min_required: usize, actual: usize },
    /// Column not found in the table.
    ColumnNotFound { name: String },
    /// The column's question type cannot enter a cross-tabulation.
    NotAnalyzable { name: String, question_type: String },
    /// The test statistic came out non-finite; no result is fabricated.
    NonFiniteStatistic,
    /// I/O error during file reading.
    Io(String),
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CsvParse { line, message } => {
                write!(f, "CSV parse error at line {line}: {message}")
            }
            Self::IncompatibleColumns { expected, actual } => {
                write!(f, "columns have different lengths: {expected} vs {actual}")
            }
            Self::InsufficientData {
                min_required,
                actual,
            } => {
                write!(f, "need at least {min_required} observations, got {actual}")
            }
            Self::ColumnNotFound { name } => {
                write!(f, "column '{name}' not found")
            }
            Self::NotAnalyzable {
                name,
                question_type,
            } => {
                write!(f, "column '{name}' ({question_type}) is not analyzable")
            }
            Self::NonFiniteStatistic => {
                write!(f, "test statistic is not finite")
            }
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for SurveyError {}

impl From<std::io::Error> for SurveyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
