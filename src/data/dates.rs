use chrono::{NaiveDate, NaiveDateTime};

use super::model::{DataError, DateRange, Table, Value, MONTH_COLUMN};

// ---------------------------------------------------------------------------
// Date coercion
// ---------------------------------------------------------------------------

/// Date formats tried in order when coercing a text cell.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
];

/// Datetime formats accepted with the time-of-day part discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a date out of a raw string, trying each supported format.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Coerce one cell to a date. Already-normalized dates pass through;
/// numbers and nulls are treated as missing.
fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => parse_date(s),
        Value::Number(_) | Value::Null => None,
    }
}

/// Fixed-width year-month label, e.g. "2024-01". Lexicographic order of
/// these labels equals chronological order.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// ---------------------------------------------------------------------------
// Normalize & filter
// ---------------------------------------------------------------------------

/// Min/max coercible date in the chosen column, i.e. the default range
/// bounds when the user has not picked any. `None` when nothing coerces.
pub fn date_span(table: &Table, date_column: &str) -> Result<Option<DateRange>, DataError> {
    let mut span: Option<DateRange> = None;
    for value in table.column(date_column)? {
        if let Some(d) = coerce_date(value) {
            span = Some(match span {
                None => DateRange { start: d, end: d },
                Some(r) => DateRange {
                    start: r.start.min(d),
                    end: r.end.max(d),
                },
            });
        }
    }
    Ok(span)
}

/// Normalize the chosen date column and narrow the table to the range.
///
/// 1. Every cell of `date_column` is coerced to a date; failures are missing.
/// 2. Rows with a missing date are dropped permanently.
/// 3. A missing `range` defaults to the surviving min/max span.
/// 4. Rows are kept when `start <= date <= end`, compared chronologically.
/// 5. A `Month` column holding the `YYYY-MM` bucket is derived; if the table
///    already carries one (a previous pass), it is recomputed in place, so
///    the operation is idempotent.
///
/// Zero coercible dates yield an empty table, not an error; downstream
/// aggregation handles that without crashing.
pub fn normalize_and_filter(
    table: &Table,
    date_column: &str,
    range: Option<DateRange>,
) -> Result<Table, DataError> {
    let date_idx = table.column_index(date_column)?;

    // Coerce and drop in upload order.
    let mut survivors: Vec<(Vec<Value>, NaiveDate)> = Vec::new();
    for row in &table.rows {
        if let Some(d) = coerce_date(&row[date_idx]) {
            let mut row = row.clone();
            row[date_idx] = Value::Date(d);
            survivors.push((row, d));
        }
    }

    let range = range.or_else(|| {
        let dates = survivors.iter().map(|(_, d)| *d);
        let start = dates.clone().min()?;
        let end = dates.max()?;
        Some(DateRange { start, end })
    });

    let mut headers = table.headers.clone();
    let month_idx = match headers.iter().position(|h| h == MONTH_COLUMN) {
        Some(idx) => idx,
        None => {
            headers.push(MONTH_COLUMN.to_string());
            headers.len() - 1
        }
    };

    let mut rows = Vec::with_capacity(survivors.len());
    for (mut row, date) in survivors {
        let keep = match range {
            Some(r) => r.contains(date),
            // No range can only happen with zero survivors; unreachable here.
            None => true,
        };
        if !keep {
            continue;
        }
        let label = Value::Text(month_label(date));
        if month_idx == row.len() {
            row.push(label);
        } else {
            row[month_idx] = label;
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const SALES_CSV: &str = "\
date,region,sales
2024-01-05,East,100
2024-01-20,West,200
2024-02-01,East,50
";

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(d("2024-01-05")));
        assert_eq!(parse_date("2024/01/05"), Some(d("2024-01-05")));
        assert_eq!(parse_date("05/01/2024"), Some(d("2024-01-05")));
        assert_eq!(parse_date("2024-01-05 13:45:00"), Some(d("2024-01-05")));
        assert_eq!(parse_date("not-a-date"), None);
    }

    #[test]
    fn drops_unparseable_rows_and_adds_month() {
        let csv = "date,sales\n2024-01-05,100\nnot-a-date,999\n2024-02-01,50\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(
            filtered.headers,
            vec!["date", "sales", MONTH_COLUMN]
        );
        assert_eq!(filtered.rows[0][2], Value::Text("2024-01".into()));
        assert_eq!(filtered.rows[1][2], Value::Text("2024-02".into()));
        assert_eq!(filtered.rows[0][0], Value::Date(d("2024-01-05")));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        let range = DateRange {
            start: d("2024-01-05"),
            end: d("2024-01-20"),
        };
        let filtered = normalize_and_filter(&table, "date", Some(range)).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn default_range_spans_surviving_dates() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        let span = date_span(&table, "date").unwrap().unwrap();
        assert_eq!(span.start, d("2024-01-05"));
        assert_eq!(span.end, d("2024-02-01"));

        let filtered = normalize_and_filter(&table, "date", None).unwrap();
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn is_idempotent() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        let range = Some(DateRange {
            start: d("2024-01-01"),
            end: d("2024-01-31"),
        });
        let once = normalize_and_filter(&table, "date", range).unwrap();
        let twice = normalize_and_filter(&once, "date", range).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_survivors_yield_empty_table() {
        let csv = "date,sales\nnope,1\nalso-nope,2\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(filtered.headers.last().map(String::as_str), Some(MONTH_COLUMN));
        assert_eq!(date_span(&table, "date").unwrap(), None);
    }
}
