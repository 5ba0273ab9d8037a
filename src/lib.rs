//! # survey-insight
//!
//! Survey question-type classification and cross-variable relationship
//! analysis.
//!
//! survey-insight turns raw survey exports into statistical findings. It
//! operates in two distinct layers:
//!
//! - **Classification** — tolerates dirty data, infers what kind of
//!   question each column holds and never fails
//! - **Analysis** — requires classified categorical-like columns, tests
//!   pairs of questions for statistical dependence
//!
//! ## Modules
//!
//! - [`table`] — Tagged-cell data model (Cell, Column, Table)
//! - [`csv_loader`] — CSV loading with missing-marker normalization, no type inference
//! - [`classify`] — Question-type classification (categorical, rating, yes/no, numeric, text, identifier)
//! - [`crosstab`] — Contingency tables with pairwise deletion and category pruning
//! - [`analyze`] — Chi-square independence test, Cramér's V, Fisher 2×2 fallback, tiered verdicts
//! - [`summary`] — Response distributions and dataset overview metrics
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use survey_insight::analyze::{analyze, AnalyzeConfig};
//! use survey_insight::classify::{classify_table, ClassifyConfig, QuestionType};
//! use survey_insight::csv_loader::CsvLoader;
//!
//! let csv = "\
//! Pol,Zadovoljstvo
//! M,da
//! Z,ne
//! M,da
//! Z,da
//! M,ne
//! Z,ne
//! ";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//! let columns = classify_table(&table, &ClassifyConfig::default());
//!
//! assert_eq!(columns[0].question_type(), QuestionType::Categorical);
//! assert_eq!(columns[1].question_type(), QuestionType::YesNo);
//!
//! let result = analyze(&columns[0], &columns[1], &AnalyzeConfig::default()).unwrap();
//! assert!((0.0..=1.0).contains(&result.p_value));
//! ```

pub mod analyze;
pub mod classify;
pub mod crosstab;
pub mod csv_loader;
pub mod error;
pub mod summary;
pub mod table;
