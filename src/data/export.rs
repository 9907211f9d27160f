use super::model::{DataError, Table};

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Serialize the table back to CSV bytes: header row first, then the rows
/// in their surviving order (upload order minus dropped rows). Dates are
/// written as ISO `YYYY-MM-DD`, nulls as empty cells.
pub fn export_csv(table: &Table) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DataError::Parse(csv::Error::from(e.into_error())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dates::normalize_and_filter;
    use crate::data::loader::load_bytes;

    const SALES_CSV: &str = "\
date,region,sales
2024-01-05,East,100
not-a-date,Ghost,999
2024-01-20,West,200
2024-02-01,East,50
";

    #[test]
    fn round_trips_the_filtered_table() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();

        let bytes = export_csv(&filtered).unwrap();
        let reloaded = load_bytes(&bytes).unwrap();

        assert_eq!(reloaded.headers, filtered.headers);
        assert_eq!(reloaded.len(), filtered.len());
        for (before, after) in filtered.rows.iter().zip(&reloaded.rows) {
            for (a, b) in before.iter().zip(after) {
                assert_eq!(a.to_string(), b.to_string());
            }
        }
    }

    #[test]
    fn preserves_surviving_row_order() {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();
        let text = String::from_utf8(export_csv(&filtered).unwrap()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,region,sales,Month");
        assert_eq!(lines[1], "2024-01-05,East,100,2024-01");
        assert_eq!(lines[2], "2024-01-20,West,200,2024-01");
        assert_eq!(lines[3], "2024-02-01,East,50,2024-02");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let table = load_bytes("a,b\n".as_bytes()).unwrap();
        let text = String::from_utf8(export_csv(&table).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "a,b");
    }
}
