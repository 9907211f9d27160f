use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::color::{correlation_color, CategoryColors};
use crate::data::model::{CategoryBreakdown, CorrelationMatrix, Histogram, MonthlySeries};
use crate::state::{AppState, Derived};

// ---------------------------------------------------------------------------
// Central panel – KPIs and charts
// ---------------------------------------------------------------------------

/// Render the analytics view: per metric a KPI strip, the monthly trend,
/// the distribution histogram and (if a category is chosen) the category
/// breakdown; the correlation grid at the bottom.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(derived) = &state.derived else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to begin analysis  (File → Open…)");
        });
        return;
    };

    if state.metrics.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select at least one metric in the Controls panel");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, metric) in state.metrics.iter().enumerate() {
                ui.heading(format!("Analysis – {metric}"));
                kpi_strip(ui, derived, i);
                ui.add_space(8.0);

                ui.columns(2, |cols: &mut [Ui]| {
                    trend_chart(&mut cols[0], metric, &derived.monthly[i].1);
                    histogram_chart(&mut cols[1], metric, &derived.histograms[i].1);
                });

                if let Some((_, breakdown)) = derived.breakdowns.get(i) {
                    ui.add_space(8.0);
                    ui.strong("Top categories");
                    breakdown_chart(ui, metric, breakdown);
                }

                ui.separator();
            }

            if let Some(matrix) = &derived.correlation {
                ui.heading("Correlation");
                correlation_grid(ui, matrix);
            }
        });
}

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

fn kpi_strip(ui: &mut Ui, derived: &Derived, metric_idx: usize) {
    let (_, summary) = &derived.summaries[metric_idx];
    ui.horizontal(|ui: &mut Ui| {
        for (label, value) in [
            ("Total", summary.total),
            ("Average", summary.average),
            ("Max", summary.max),
            ("Min", summary.min),
        ] {
            ui.group(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(label);
                    ui.strong(format!("{value:.2}"));
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Monthly trend (line)
// ---------------------------------------------------------------------------

fn trend_chart(ui: &mut Ui, metric: &str, series: &MonthlySeries) {
    let labels: Vec<String> = series.iter().map(|(month, _)| month.clone()).collect();
    let points: PlotPoints = series
        .iter()
        .enumerate()
        .map(|(i, (_, v))| [i as f64, *v])
        .collect();

    Plot::new(format!("trend_{metric}"))
        .height(220.0)
        .x_axis_label("Month")
        .y_axis_label(format!("Total {metric}"))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as i64;
            // Only integer marks correspond to months.
            if (mark.value - idx as f64).abs() > 1e-6 || idx < 0 {
                return String::new();
            }
            labels
                .get(idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Distribution (histogram)
// ---------------------------------------------------------------------------

fn histogram_chart(ui: &mut Ui, metric: &str, histogram: &Histogram) {
    // Bin width from the first two edges; single-bin histograms get a
    // nominal width so the bar stays visible.
    let width = match histogram.as_slice() {
        [(a, _), (b, _), ..] => *b - *a,
        _ => 1.0,
    };

    let bars: Vec<Bar> = histogram
        .iter()
        .map(|(edge, count)| {
            Bar::new(edge + width / 2.0, *count as f64)
                .width(width)
                .fill(Color32::from_rgb(100, 160, 220))
        })
        .collect();

    Plot::new(format!("hist_{metric}"))
        .height(220.0)
        .x_axis_label(metric.to_string())
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Category breakdown (bar)
// ---------------------------------------------------------------------------

fn breakdown_chart(ui: &mut Ui, metric: &str, breakdown: &CategoryBreakdown) {
    let colors = CategoryColors::new(breakdown.iter().map(|(label, _)| label.as_str()));
    let labels: Vec<String> = breakdown.iter().map(|(label, _)| label.clone()).collect();

    let bars: Vec<Bar> = breakdown
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .width(0.7)
                .name(label)
                .fill(colors.color_for(label))
        })
        .collect();

    Plot::new(format!("breakdown_{metric}"))
        .height(220.0)
        .y_axis_label(format!("Total {metric}"))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as i64;
            if (mark.value - idx as f64).abs() > 1e-6 || idx < 0 {
                return String::new();
            }
            labels
                .get(idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Correlation grid
// ---------------------------------------------------------------------------

fn correlation_grid(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation_grid")
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &matrix.columns {
                ui.strong(name);
            }
            ui.end_row();

            for (i, name) in matrix.columns.iter().enumerate() {
                ui.strong(name);
                for &r in &matrix.values[i] {
                    let text = if r.is_nan() {
                        "–".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    ui.label(
                        RichText::new(text)
                            .background_color(correlation_color(r))
                            .color(Color32::BLACK),
                    );
                }
                ui.end_row();
            }
        });
}
