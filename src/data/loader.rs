use std::path::Path;

use anyhow::{Context, Result};

use super::model::{DataError, Table, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a CSV file on disk.
pub fn load_file(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).context("reading CSV file")?;
    load_bytes(&bytes).context("parsing CSV")
}

/// Parse CSV bytes (comma-delimited, UTF-8, header row required) into a
/// typed [`Table`].
///
/// Column types are inferred once over the whole column: if every non-empty
/// cell parses as a float and at least one does, the column is numeric;
/// otherwise every cell stays text. Empty cells become [`Value::Null`]
/// either way. A malformed file yields [`DataError::Parse`] and no partial
/// table.
pub fn load_bytes(bytes: &[u8]) -> Result<Table, DataError> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    // First pass: collect raw cells so the whole file is known to be
    // well-formed before any typing decision is made.
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        // The reader rejects ragged rows (field count != header count),
        // so every surviving record is exactly headers.len() wide.
        let row: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
        raw_rows.push(row);
    }

    // Per-column type inference.
    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| column_is_numeric(&raw_rows, col))
        .collect();

    let rows: Vec<Vec<Value>> = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(col, cell)| typed_cell(&cell, numeric[col]))
                .collect()
        })
        .collect();

    Ok(Table { headers, rows })
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// A column is numeric when every non-empty cell parses as `f64` and the
/// column holds at least one such cell. A single non-numeric string makes
/// the entire column categorical (no per-value mixed typing).
fn column_is_numeric(rows: &[Vec<String>], col: usize) -> bool {
    let mut saw_number = false;
    for row in rows {
        let cell = &row[col];
        if cell.is_empty() {
            continue;
        }
        if cell.parse::<f64>().is_err() {
            return false;
        }
        saw_number = true;
    }
    saw_number
}

fn typed_cell(cell: &str, numeric: bool) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if numeric {
        // Guaranteed to parse by column_is_numeric.
        match cell.parse::<f64>() {
            Ok(v) => Value::Number(v),
            Err(_) => Value::Null,
        }
    } else {
        Value::Text(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES_CSV: &str = "\
date,region,sales
2024-01-05,East,100
2024-01-20,West,200
2024-02-01,East,50
";

    #[test]
    fn loads_headers_and_typed_cells() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["date", "region", "sales"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0][1], Value::Text("East".into()));
        assert_eq!(table.rows[1][2], Value::Number(200.0));
    }

    #[test]
    fn one_bad_cell_makes_the_whole_column_text() {
        let csv = "a,b\n1,2\nnot-a-number,3\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0][0], Value::Text("1".into()));
        assert_eq!(table.rows[1][0], Value::Text("not-a-number".into()));
        assert_eq!(table.rows[0][1], Value::Number(2.0));
    }

    #[test]
    fn empty_cells_become_null_without_breaking_inference() {
        let csv = "a,b\n1,x\n,y\n3,\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[1][0], Value::Null);
        assert_eq!(table.rows[0][0], Value::Number(1.0));
        assert_eq!(table.rows[2][1], Value::Null);
    }

    #[test]
    fn all_empty_column_is_not_numeric() {
        let csv = "a,b\n,x\n,y\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        // No numeric evidence at all: the column stays categorical (nulls).
        assert_eq!(table.rows[0][0], Value::Null);
        assert_eq!(table.rows[1][0], Value::Null);
    }

    #[test]
    fn malformed_csv_is_a_parse_error() {
        // Second row has a field count that disagrees with the header.
        let csv = "a,b\n1,2\n3\n";
        let err = load_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn header_only_file_loads_empty() {
        let table = load_bytes("a,b,c\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 3);
    }
}
