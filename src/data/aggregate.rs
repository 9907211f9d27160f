use std::collections::BTreeMap;

use super::model::{
    CategoryBreakdown, DataError, Histogram, MetricSummary, MonthlySeries, Table, Value,
    MONTH_COLUMN,
};

/// Number of category groups kept verbatim before the long tail is folded
/// into the synthetic "Others" bucket.
const TOP_CATEGORIES: usize = 10;

/// Label of the long-tail bucket.
pub const OTHERS_LABEL: &str = "Others";

/// Default bin count for the distribution histogram.
pub const DEFAULT_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Metric extraction
// ---------------------------------------------------------------------------

/// Collect a metric column as floats, failing fast when the column holds
/// anything other than numbers. Nulls are skipped, matching the loader's
/// treatment of empty cells.
fn metric_values(table: &Table, metric: &str) -> Result<Vec<f64>, DataError> {
    let mut out = Vec::with_capacity(table.len());
    for value in table.column(metric)? {
        match value {
            Value::Number(v) => out.push(*v),
            Value::Null => {}
            other => {
                return Err(DataError::ColumnType {
                    column: metric.to_string(),
                    found: other.kind().to_string(),
                })
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Sum, mean, max and min of one metric over the filtered table.
///
/// An empty table (or an all-null column) returns [`MetricSummary::ZERO`]
/// rather than dividing by zero.
pub fn summarize(table: &Table, metric: &str) -> Result<MetricSummary, DataError> {
    let values = metric_values(table, metric)?;
    if values.is_empty() {
        return Ok(MetricSummary::ZERO);
    }

    let total: f64 = values.iter().sum();
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);

    Ok(MetricSummary {
        total,
        average: total / values.len() as f64,
        max,
        min,
    })
}

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

/// Sum the metric per `Month` bucket, ascending by month label.
///
/// The table must have passed through date normalization (which derives the
/// `Month` column); rows whose metric cell is null contribute nothing.
pub fn monthly_series(table: &Table, metric: &str) -> Result<MonthlySeries, DataError> {
    let month_idx = table.column_index(MONTH_COLUMN)?;
    let metric_idx = table.column_index(metric)?;

    // BTreeMap keys iterate sorted, and "YYYY-MM" sorts chronologically.
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in &table.rows {
        let value = match &row[metric_idx] {
            Value::Number(v) => *v,
            Value::Null => continue,
            other => {
                return Err(DataError::ColumnType {
                    column: metric.to_string(),
                    found: other.kind().to_string(),
                })
            }
        };
        let month = row[month_idx].to_string();
        *totals.entry(month).or_insert(0.0) += value;
    }

    Ok(totals.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// Sum the metric per category, sort descending by total, keep the top 10
/// groups and fold the remainder into a trailing "Others" entry when its
/// sum is strictly positive. Never longer than 11 entries.
///
/// Ties at the cut fall out in the grouping's natural iteration order
/// (ascending label); no secondary sort is promised.
pub fn category_breakdown(
    table: &Table,
    metric: &str,
    category: &str,
) -> Result<CategoryBreakdown, DataError> {
    let category_idx = table.column_index(category)?;
    let metric_idx = table.column_index(metric)?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in &table.rows {
        let value = match &row[metric_idx] {
            Value::Number(v) => *v,
            Value::Null => continue,
            other => {
                return Err(DataError::ColumnType {
                    column: metric.to_string(),
                    found: other.kind().to_string(),
                })
            }
        };
        let label = row[category_idx].to_string();
        *totals.entry(label).or_insert(0.0) += value;
    }

    let mut groups: Vec<(String, f64)> = totals.into_iter().collect();
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    let others_sum: f64 = groups
        .iter()
        .skip(TOP_CATEGORIES)
        .map(|(_, v)| *v)
        .sum();
    groups.truncate(TOP_CATEGORIES);
    if others_sum > 0.0 {
        groups.push((OTHERS_LABEL.to_string(), others_sum));
    }

    Ok(groups)
}

// ---------------------------------------------------------------------------
// Distribution histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over the metric's value range, returned as
/// `(bin lower edge, count)` pairs. Empty input yields no bins; a constant
/// column collapses into a single bin holding every row.
pub fn histogram(table: &Table, metric: &str, bins: usize) -> Result<Histogram, DataError> {
    let values = metric_values(table, metric)?;
    if values.is_empty() || bins == 0 {
        return Ok(Vec::new());
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width == 0.0 {
        return Ok(vec![(min, values.len())]);
    }

    let mut counts = vec![0usize; bins];
    for v in &values {
        let mut bin = ((v - min) / width) as usize;
        // The maximum lands exactly on the upper edge of the last bin.
        if bin >= bins {
            bin = bins - 1;
        }
        counts[bin] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| (min + i as f64 * width, n))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dates::normalize_and_filter;
    use crate::data::loader::load_bytes;

    const SALES_CSV: &str = "\
date,region,sales
2024-01-05,East,100
2024-01-20,West,200
2024-02-01,East,50
";

    fn filtered_sales() -> Table {
        let table = load_bytes(SALES_CSV.as_bytes()).unwrap();
        normalize_and_filter(&table, "date", None).unwrap()
    }

    #[test]
    fn summary_matches_the_sales_scenario() {
        let summary = summarize(&filtered_sales(), "sales").unwrap();
        assert_eq!(summary.total, 350.0);
        assert!((summary.average - 350.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.max, 200.0);
        assert_eq!(summary.min, 50.0);
    }

    #[test]
    fn summary_on_empty_table_is_the_zero_sentinel() {
        let table = load_bytes("date,sales\n".as_bytes()).unwrap();
        let summary = summarize(&table, "sales").unwrap();
        assert_eq!(summary, MetricSummary::ZERO);
    }

    #[test]
    fn summarizing_a_text_column_fails_fast() {
        let err = summarize(&filtered_sales(), "region").unwrap_err();
        assert!(matches!(err, DataError::ColumnType { .. }));
    }

    #[test]
    fn monthly_series_groups_and_sorts_by_month() {
        let series = monthly_series(&filtered_sales(), "sales").unwrap();
        assert_eq!(
            series,
            vec![("2024-01".to_string(), 300.0), ("2024-02".to_string(), 50.0)]
        );
    }

    #[test]
    fn breakdown_sorts_descending_by_total() {
        let breakdown = category_breakdown(&filtered_sales(), "sales", "region").unwrap();
        assert_eq!(
            breakdown,
            vec![("West".to_string(), 200.0), ("East".to_string(), 150.0)]
        );
    }

    #[test]
    fn breakdown_folds_the_long_tail_into_others() {
        let mut csv = String::from("date,cat,v\n");
        for i in 0..13 {
            // cat00 gets 130, cat01 gets 120, ... cat12 gets 10.
            csv.push_str(&format!("2024-01-0{},cat{:02},{}\n", i % 9 + 1, i, (13 - i) * 10));
        }
        let table = load_bytes(csv.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();
        let breakdown = category_breakdown(&filtered, "v", "cat").unwrap();

        assert_eq!(breakdown.len(), TOP_CATEGORIES + 1);
        assert_eq!(breakdown[0], ("cat00".to_string(), 130.0));
        // Remainder: 30 + 20 + 10.
        assert_eq!(breakdown.last().unwrap(), &(OTHERS_LABEL.to_string(), 60.0));
    }

    #[test]
    fn others_is_absent_when_the_remainder_is_zero() {
        let breakdown = category_breakdown(&filtered_sales(), "sales", "region").unwrap();
        assert!(breakdown.iter().all(|(label, _)| label != OTHERS_LABEL));
        assert!(breakdown.len() <= TOP_CATEGORIES + 1);
    }

    #[test]
    fn histogram_conserves_the_row_count() {
        let hist = histogram(&filtered_sales(), "sales", 5).unwrap();
        assert_eq!(hist.len(), 5);
        let total: usize = hist.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn histogram_of_a_constant_column_is_one_bin() {
        let csv = "date,v\n2024-01-01,7\n2024-01-02,7\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let filtered = normalize_and_filter(&table, "date", None).unwrap();
        let hist = histogram(&filtered, "v", DEFAULT_BINS).unwrap();
        assert_eq!(hist, vec![(7.0, 2)]);
    }
}
