use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::state::AppState;

/// One user action collected while drawing the grid, applied afterwards so
/// the table closures only need shared access to the pivot.
enum Edit {
    Cell { row: usize, col: usize, value: f64 },
    Remove { row: usize },
}

// ---------------------------------------------------------------------------
// Editable pivot grid
// ---------------------------------------------------------------------------

/// Render the sales-by-date-by-category table with editable cells and
/// dynamic rows.
pub fn pivot_editor(ui: &mut Ui, state: &mut AppState) {
    let mut edits: Vec<Edit> = Vec::new();

    let pivot = &state.pivot;
    let date_format = state.config.date_display_format.as_str();
    let n_cols = pivot.categories.len();

    ui.push_id("pivot_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(110.0))
            .columns(Column::remainder().at_least(90.0), n_cols)
            .column(Column::exact(24.0))
            .min_scrolled_height(0.0)
            .max_scroll_height(state.config.table_height)
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Order Date");
                });
                for category in &pivot.categories {
                    header.col(|ui: &mut Ui| {
                        ui.strong(category);
                    });
                }
                header.col(|_ui: &mut Ui| {});
            })
            .body(|body| {
                body.rows(20.0, pivot.rows.len(), |mut row| {
                    let r = row.index();
                    let pivot_row = &pivot.rows[r];
                    row.col(|ui: &mut Ui| {
                        ui.label(pivot_row.date.format(date_format).to_string());
                    });
                    for c in 0..n_cols {
                        row.col(|ui: &mut Ui| {
                            let mut value = pivot.value(r, c).unwrap_or_default();
                            let response = ui.add(
                                egui::DragValue::new(&mut value)
                                    .prefix("$")
                                    .speed(1.0)
                                    .fixed_decimals(0),
                            );
                            if response.changed() {
                                edits.push(Edit::Cell { row: r, col: c, value });
                            }
                        });
                    }
                    row.col(|ui: &mut Ui| {
                        if ui.small_button("🗑").on_hover_text("Delete row").clicked() {
                            edits.push(Edit::Remove { row: r });
                        }
                    });
                });
            });
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{} rows", pivot.rows.len()));
        for (c, category) in pivot.categories.iter().enumerate() {
            ui.separator();
            ui.label(format!("{category}: ${:.0}", pivot.column_total(c)));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Add row for");
        ui.add(DatePickerButton::new(&mut state.new_row_date).id_salt("new_row_date"));
        if ui.button("➕ Add row").clicked() {
            let date = state.new_row_date;
            state.add_row(date);
        }
    });

    for edit in edits {
        let result = match edit {
            Edit::Cell { row, col, value } => state.edit_cell(row, col, value),
            Edit::Remove { row } => state.remove_row(row),
        };
        if let Err(e) = result {
            log::warn!("table edit rejected: {e}");
        }
    }
}
