use crate::data::aggregate::{
    category_breakdown, histogram, monthly_series, summarize, DEFAULT_BINS,
};
use crate::data::classify::{classify, ColumnRole, ColumnRoles};
use crate::data::correlate::correlation_matrix;
use crate::data::dates::{date_span, normalize_and_filter};
use crate::data::model::{
    CategoryBreakdown, CorrelationMatrix, DataError, DateRange, Histogram, MetricSummary,
    MonthlySeries, Table,
};

// ---------------------------------------------------------------------------
// Derived outputs of one pipeline run
// ---------------------------------------------------------------------------

/// Everything the charts consume, recomputed from scratch on every control
/// change. A new run replaces the previous instance wholesale.
pub struct Derived {
    /// The date-filtered table with the derived Month column.
    pub filtered: Table,
    /// Per selected metric, in selection order.
    pub summaries: Vec<(String, MetricSummary)>,
    pub monthly: Vec<(String, MonthlySeries)>,
    pub histograms: Vec<(String, Histogram)>,
    /// Present only when a category column is chosen.
    pub breakdowns: Vec<(String, CategoryBreakdown)>,
    /// Present only with two or more numeric columns.
    pub correlation: Option<CorrelationMatrix>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded raw table (None until the user opens a file).
    pub table: Option<Table>,

    /// Column role partition, fixed per loaded table.
    pub roles: ColumnRoles,

    /// Which column holds the dates.
    pub date_column: Option<String>,

    /// Optional category column; None is the "(none)" sentinel.
    pub category_column: Option<String>,

    /// Selected metric columns, in selection order.
    pub metrics: Vec<String>,

    /// Inclusive date range; materialized to the min/max span of the
    /// surviving dates on the first run after a date-column change.
    pub range: Option<DateRange>,

    /// Outputs of the latest pipeline run.
    pub derived: Option<Derived>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            roles: ColumnRoles::default(),
            date_column: None,
            category_column: None,
            metrics: Vec::new(),
            range: None,
            derived: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table: classify columns, pick defaults
    /// (first column as date, first numeric column as metric) and run
    /// the pipeline once.
    pub fn set_table(&mut self, table: Table) {
        self.roles = classify(&table);
        self.date_column = table.headers.first().cloned();
        self.category_column = None;
        self.metrics = table
            .headers
            .iter()
            .find(|h| self.roles.numeric.contains(*h))
            .cloned()
            .into_iter()
            .collect();
        self.range = None;
        self.table = Some(table);
        self.status_message = None;
        self.rerun();
    }

    /// Columns eligible as metrics, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        match &self.table {
            Some(table) => table
                .headers
                .iter()
                .filter(|h| self.roles.role_of(h) == Some(ColumnRole::Numeric))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Columns eligible as the category, in header order.
    pub fn categorical_columns(&self) -> Vec<String> {
        match &self.table {
            Some(table) => table
                .headers
                .iter()
                .filter(|h| self.roles.role_of(h) == Some(ColumnRole::Categorical))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn set_date_column(&mut self, column: String) {
        self.date_column = Some(column);
        // The range was scoped to the previous date column; re-derive it.
        self.range = None;
        self.rerun();
    }

    pub fn set_category_column(&mut self, column: Option<String>) {
        self.category_column = column;
        self.rerun();
    }

    pub fn toggle_metric(&mut self, column: &str) {
        match self.metrics.iter().position(|m| m == column) {
            Some(idx) => {
                self.metrics.remove(idx);
            }
            None => self.metrics.push(column.to_string()),
        }
        self.rerun();
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = Some(range);
        self.rerun();
    }

    /// One full pipeline run: normalize/filter, then aggregate, correlate
    /// and keep the filtered table ready for export. Errors land in the
    /// status line and clear the derived state.
    pub fn rerun(&mut self) {
        self.derived = None;
        match self.compute() {
            Ok(derived) => {
                self.derived = derived;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("pipeline run failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn compute(&mut self) -> Result<Option<Derived>, DataError> {
        let (Some(table), Some(date_column)) = (&self.table, self.date_column.clone()) else {
            return Ok(None);
        };

        // Materialize the default range explicitly so the pickers show it.
        if self.range.is_none() {
            self.range = date_span(table, &date_column)?;
        }

        let filtered = normalize_and_filter(table, &date_column, self.range)?;

        let mut summaries = Vec::new();
        let mut monthly = Vec::new();
        let mut histograms = Vec::new();
        let mut breakdowns = Vec::new();
        for metric in &self.metrics {
            summaries.push((metric.clone(), summarize(&filtered, metric)?));
            monthly.push((metric.clone(), monthly_series(&filtered, metric)?));
            histograms.push((metric.clone(), histogram(&filtered, metric, DEFAULT_BINS)?));
            if let Some(category) = &self.category_column {
                breakdowns.push((
                    metric.clone(),
                    category_breakdown(&filtered, metric, category)?,
                ));
            }
        }

        let correlation = correlation_matrix(&filtered, &self.numeric_columns());

        Ok(Some(Derived {
            filtered,
            summaries,
            monthly,
            histograms,
            breakdowns,
            correlation,
        }))
    }
}
