//! CSV loading into a raw [`Table`](crate::table::Table) of tagged cells.
//!
//! The loader does exactly two things: it parses RFC 4180 CSV (quoted
//! fields, escaped quotes, embedded delimiters and newlines, BOM, CRLF)
//! and it normalizes recognized missing markers to [`Cell::Missing`].
//! Values that parse as numbers are tagged [`Cell::Number`]; everything
//! else stays [`Cell::Text`]. Question-type interpretation is deliberately
//! NOT done here — that is the classifier's job, with its own config.
//!
//! # Example
//!
//! ```
//! use survey_insight::csv_loader::CsvLoader;
//!
//! let csv = "city,rating\nGrad,4\nSelo,NA\nGrad,5\n";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//! assert_eq!(table.respondent_count(), 3);
//! assert_eq!(table.columns()[1].missing_count(), 1);
//! ```

use crate::error::SurveyError;
use crate::table::{parse_number, Cell, Column, Table};

/// Markers normalized to missing during loading.
const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "NA", "na", "N/A", "n/a", "null", "NULL", "None", "none", "-", ".",
    "NaN", "nan", "#N/A",
];

/// CSV loader configuration and entry point.
///
/// ```
/// use survey_insight::csv_loader::CsvLoader;
///
/// let table = CsvLoader::new()
///     .delimiter(b';')
///     .load_str("a;b\n1;2\n")
///     .unwrap();
/// assert_eq!(table.question_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    has_header: bool,
    missing_markers: Vec<String>,
}

impl CsvLoader {
    /// Creates a loader with default settings: comma delimiter, header row,
    /// standard missing markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the first record is a header row (default: true).
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Replaces the missing-value markers.
    pub fn missing_markers(mut self, markers: Vec<String>) -> Self {
        self.missing_markers = markers;
        self
    }

    /// Loads a CSV string into a table of raw cells.
    pub fn load_str(&self, input: &str) -> Result<Table, SurveyError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let records = self.split_records(input);
        if records.is_empty() {
            return Ok(Table::new());
        }

        let (headers, data): (Vec<String>, &[Vec<String>]) = if self.has_header {
            (records[0].clone(), &records[1..])
        } else {
            let names = (0..records[0].len()).map(|i| format!("q_{i}")).collect();
            (names, &records[..])
        };

        if data.is_empty() {
            return Ok(Table::new());
        }

        let n_cols = headers.len();
        let mut cells: Vec<Vec<Cell>> = vec![Vec::with_capacity(data.len()); n_cols];
        for (rec_idx, record) in data.iter().enumerate() {
            if record.len() != n_cols {
                return Err(SurveyError::CsvParse {
                    line: rec_idx + if self.has_header { 2 } else { 1 },
                    message: format!("expected {n_cols} fields, got {}", record.len()),
                });
            }
            for (col, field) in record.iter().enumerate() {
                cells[col].push(self.make_cell(field));
            }
        }

        let mut table = Table::new();
        for (name, col_cells) in headers.into_iter().zip(cells) {
            table.add_column(Column::new(name, col_cells))?;
        }
        Ok(table)
    }

    /// Loads a CSV file from disk.
    pub fn load_file(&self, path: &str) -> Result<Table, SurveyError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    // ── Internal ─────────────────────────────────────────────────

    /// Tags one raw field as a cell: missing marker → `Missing`, number →
    /// `Number`, anything else → trimmed `Text`.
    fn make_cell(&self, field: &str) -> Cell {
        let trimmed = field.trim();
        if self.missing_markers.iter().any(|m| m == trimmed) {
            return Cell::Missing;
        }
        match parse_number(trimmed) {
            Some(x) => Cell::Number(x),
            None => Cell::text(trimmed),
        }
    }

    /// Splits CSV text into records of raw fields, honoring quoting.
    fn split_records(&self, input: &str) -> Vec<Vec<String>> {
        let delim = self.delimiter as char;
        let mut records: Vec<Vec<String>> = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut quoted = false;

        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            if quoted {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    _ => field.push(c),
                }
                continue;
            }
            match c {
                '"' if field.is_empty() => quoted = true,
                c if c == delim => record.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {} // consumed by the \n
                '\n' | '\r' => {
                    record.push(std::mem::take(&mut field));
                    flush_record(&mut records, &mut record);
                }
                _ => field.push(c),
            }
        }
        if !field.is_empty() || !record.is_empty() {
            record.push(field);
            flush_record(&mut records, &mut record);
        }
        records
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Pushes a finished record, dropping blank lines.
///
/// A blank line yields a single empty field and is not a row. A wider
/// all-empty record (",," in a 3-column file) is a respondent who skipped
/// every question and must keep its row, or N shrinks silently. In a
/// one-column file the two cases are indistinguishable; the blank-line
/// reading wins there.
fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
    if record.len() > 1 || record.iter().any(|f| !f.is_empty()) {
        records.push(std::mem::take(record));
    } else {
        record.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
