use super::model::{CorrelationMatrix, Table, Value};

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation over the given numeric columns.
///
/// Returns `None` when fewer than two numeric columns exist; the feature is
/// simply absent then, not an error. Each pair is computed over the rows
/// where both cells hold a number (pairwise deletion). A zero-variance
/// column correlates as NaN, which the presentation layer renders blank.
pub fn correlation_matrix(table: &Table, numeric_columns: &[String]) -> Option<CorrelationMatrix> {
    if numeric_columns.len() < 2 {
        return None;
    }

    // Resolve indices up front; unknown names are a caller bug and the
    // classifier never produces them, so they are silently skipped.
    let indices: Vec<usize> = numeric_columns
        .iter()
        .filter_map(|name| table.headers.iter().position(|h| h == name))
        .collect();
    if indices.len() < 2 {
        return None;
    }

    let columns: Vec<String> = indices
        .iter()
        .map(|&i| table.headers[i].clone())
        .collect();

    let n = indices.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(table, indices[i], indices[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix { columns, values })
}

/// Pearson coefficient between two columns over rows where both are numbers.
fn pearson(table: &Table, a: usize, b: usize) -> f64 {
    let pairs: Vec<(f64, f64)> = table
        .rows
        .iter()
        .filter_map(|row| match (&row[a], &row[b]) {
            (Value::Number(x), Value::Number(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn needs_at_least_two_numeric_columns() {
        let table = load_bytes("a\n1\n2\n".as_bytes()).unwrap();
        assert!(correlation_matrix(&table, &cols(&["a"])).is_none());
    }

    #[test]
    fn perfectly_correlated_columns_give_one() {
        let csv = "a,b,c\n1,2,9\n2,4,5\n3,6,1\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let matrix = correlation_matrix(&table, &cols(&["a", "b", "c"])).unwrap();

        assert_eq!(matrix.columns, vec!["a", "b", "c"]);
        // b = 2a: r = 1. c = 13 - 4a: r = -1.
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
        assert!((matrix.values[0][2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let csv = "x,y\n1,5\n2,3\n3,8\n4,2\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let matrix = correlation_matrix(&table, &cols(&["x", "y"])).unwrap();

        assert_eq!(matrix.values[0][0], 1.0);
        assert_eq!(matrix.values[1][1], 1.0);
        assert_eq!(matrix.values[0][1], matrix.values[1][0]);
        assert!(matrix.values[0][1].abs() <= 1.0);
    }

    #[test]
    fn zero_variance_column_correlates_as_nan() {
        let csv = "a,b\n1,7\n2,7\n3,7\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let matrix = correlation_matrix(&table, &cols(&["a", "b"])).unwrap();
        assert!(matrix.values[0][1].is_nan());
    }

    #[test]
    fn null_cells_are_dropped_pairwise() {
        let csv = "a,b\n1,2\n2,\n3,6\n4,8\n";
        let table = load_bytes(csv.as_bytes()).unwrap();
        let matrix = correlation_matrix(&table, &cols(&["a", "b"])).unwrap();
        // Remaining pairs (1,2) (3,6) (4,8) are exactly b = 2a.
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
    }
}
