use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::export_csv;
use crate::data::model::DateRange;
use crate::state::AppState;

/// Sentinel shown for "no category column chosen".
const NO_CATEGORY: &str = "(none)";

// ---------------------------------------------------------------------------
// Left side panel – pipeline controls
// ---------------------------------------------------------------------------

/// Render the control panel: date column, category column, metrics and
/// the inclusive date range. Every change triggers one pipeline re-run.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No file loaded.");
        return;
    };

    let all_columns = table.headers.clone();
    let numeric = state.numeric_columns();
    let categorical = state.categorical_columns();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date column ----
            ui.strong("Date column");
            let current_date = state.date_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("date_column")
                .selected_text(&current_date)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &all_columns {
                        if ui.selectable_label(current_date == *col, col).clicked() {
                            state.set_date_column(col.clone());
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- Date range ----
            ui.strong("Date range");
            if let Some(range) = state.range {
                let mut start = range.start;
                let mut end = range.end;
                let mut changed = false;
                ui.horizontal(|ui: &mut Ui| {
                    changed |= ui
                        .add(DatePickerButton::new(&mut start).id_salt("range_start"))
                        .changed();
                    ui.label("→");
                    changed |= ui
                        .add(DatePickerButton::new(&mut end).id_salt("range_end"))
                        .changed();
                });
                if changed {
                    state.set_range(DateRange { start, end });
                }
            } else {
                ui.label("No parseable dates in the chosen column.");
            }
            ui.add_space(6.0);

            // ---- Category column ----
            ui.strong("Category column");
            let current_category = state
                .category_column
                .clone()
                .unwrap_or_else(|| NO_CATEGORY.to_string());
            egui::ComboBox::from_id_salt("category_column")
                .selected_text(&current_category)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current_category == NO_CATEGORY, NO_CATEGORY)
                        .clicked()
                    {
                        state.set_category_column(None);
                    }
                    for col in &categorical {
                        if ui
                            .selectable_label(current_category == *col, col)
                            .clicked()
                        {
                            state.set_category_column(Some(col.clone()));
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- Metrics (multi-select) ----
            ui.strong("Metrics");
            if numeric.is_empty() {
                ui.label("No numeric columns in this file.");
            }
            for col in &numeric {
                let mut selected = state.metrics.iter().any(|m| m == col);
                if ui.checkbox(&mut selected, col).changed() {
                    state.toggle_metric(col);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state
                .derived
                .as_ref()
                .map(|d| !d.filtered.is_empty())
                .unwrap_or(false);
            if ui
                .add_enabled(can_export, egui::Button::new("Export cleaned CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(derived)) = (&state.table, &state.derived) {
            ui.label(format!(
                "{} rows loaded, {} in range",
                table.len(),
                derived.filtered.len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.len(),
                    table.headers
                );
                state.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_file_dialog(state: &mut AppState) {
    let Some(derived) = &state.derived else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export cleaned data")
        .set_file_name("cleaned_data.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        let result = export_csv(&derived.filtered)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
        match result {
            Ok(()) => log::info!("Exported {} rows to {}", derived.filtered.len(), path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
