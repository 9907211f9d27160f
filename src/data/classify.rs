use std::collections::BTreeSet;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Column role classification
// ---------------------------------------------------------------------------

/// Role of a column, fixed once per loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Numeric,
    Categorical,
}

/// Disjoint partition of the table's column names by role. Every column
/// appears in exactly one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub numeric: BTreeSet<String>,
    pub categorical: BTreeSet<String>,
}

impl ColumnRoles {
    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        if self.numeric.contains(column) {
            Some(ColumnRole::Numeric)
        } else if self.categorical.contains(column) {
            Some(ColumnRole::Categorical)
        } else {
            None
        }
    }
}

/// Partition the table's columns into numeric and categorical.
///
/// The decision mirrors the loader's inference: a column is numeric when it
/// holds at least one number and nothing but numbers and nulls. Any text or
/// date cell makes the column categorical in its entirety.
pub fn classify(table: &Table) -> ColumnRoles {
    let mut roles = ColumnRoles::default();

    for (idx, name) in table.headers.iter().enumerate() {
        let mut saw_number = false;
        let mut saw_other = false;
        for row in &table.rows {
            match &row[idx] {
                Value::Number(_) => saw_number = true,
                Value::Null => {}
                Value::Text(_) | Value::Date(_) => {
                    saw_other = true;
                    break;
                }
            }
        }
        if saw_number && !saw_other {
            roles.numeric.insert(name.clone());
        } else {
            roles.categorical.insert(name.clone());
        }
    }

    roles
}
