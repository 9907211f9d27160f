use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by the data pipeline.
#[derive(Debug, Error)]
pub enum DataError {
    /// The uploaded bytes are not well-formed CSV. Aborts the run, no
    /// partial table is produced.
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    /// An aggregation was requested on a column of the wrong role
    /// (e.g. summing a text column).
    #[error("column '{column}' is not numeric (found {found})")]
    ColumnType { column: String, found: String },

    /// The named column does not exist in the table.
    #[error("no such column: '{0}'")]
    UnknownColumn(String),
}

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Timezone-naive calendar date, set during date normalization.
    Date(NaiveDate),
    /// Empty cell or failed coercion.
    Null,
}

impl Value {
    /// Interpret the value as an `f64` for aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral floats print without a trailing ".0" so exported
            // CSV cells look like the uploaded ones.
            Value::Number(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.0}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the working dataset
// ---------------------------------------------------------------------------

/// Name of the derived year-month bucket column.
pub const MONTH_COLUMN: &str = "Month";

/// An ordered set of named columns over row-major typed cells. Every row
/// has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
    }

    /// Iterate one column's cells top to bottom.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value>, DataError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }
}

// ---------------------------------------------------------------------------
// Derived-table types consumed by the presentation layer
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range, user-selected or defaulted to the span
/// of the surviving dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sum / mean / max / min of one metric over the filtered table.
/// All-zero when the table is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl MetricSummary {
    /// Sentinel returned for an empty table.
    pub const ZERO: MetricSummary = MetricSummary {
        total: 0.0,
        average: 0.0,
        max: 0.0,
        min: 0.0,
    };
}

/// `("YYYY-MM", summed value)` pairs in ascending month order.
pub type MonthlySeries = Vec<(String, f64)>;

/// `(category label, summed value)` pairs, descending by value, top 10
/// plus an optional trailing "Others" bucket. At most 11 entries.
pub type CategoryBreakdown = Vec<(String, f64)>;

/// `(bin lower edge, count)` pairs over equal-width bins.
pub type Histogram = Vec<(f64, usize)>;

/// Symmetric Pearson correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// Column names indexing both axes.
    pub columns: Vec<String>,
    /// Row-major coefficients; `values[i][j]` pairs `columns[i]` with
    /// `columns[j]`. Diagonal is 1.0.
    pub values: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Value::Number(200.0).to_string(), "200");
        assert_eq!(Value::Number(116.5).to_string(), "116.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn date_range_is_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange {
            start: d("2024-01-05"),
            end: d("2024-02-01"),
        };
        assert!(range.contains(d("2024-01-05")));
        assert!(range.contains(d("2024-02-01")));
        assert!(!range.contains(d("2024-02-02")));
        assert!(!range.contains(d("2024-01-04")));
    }

    #[test]
    fn column_lookup_reports_unknown_columns() {
        let table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.column_index("a").is_ok());
        assert!(matches!(
            table.column_index("missing"),
            Err(DataError::UnknownColumn(_))
        ));
    }
}
