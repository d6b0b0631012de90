use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

/// Label colour used for every sidebar widget caption.
const LABEL_COLOR: Color32 = Color32::from_rgb(0xFF, 0x61, 0x51);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Selection");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let categories = dataset.categories.clone();
    let cities: Vec<String> = dataset.cities.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_selector(ui, state, &categories);
            ui.add_space(15.0);
            city_selector(ui, state, &cities);
            ui.add_space(15.0);
            year_selector(ui, state);
        });
}

fn caption(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(LABEL_COLOR).size(14.0));
}

fn category_selector(ui: &mut Ui, state: &mut AppState, categories: &[String]) {
    let n_selected = state.filters.categories.len();
    caption(ui, &format!("Select Category  ({n_selected}/{})", categories.len()));

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_categories();
        }
        if ui.small_button("None").clicked() {
            state.clear_categories();
        }
    });

    for category in categories {
        let mut checked = state.filters.categories.contains(category);
        let text = RichText::new(category).color(state.color_map.color_for(category));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_category(category);
        }
    }
}

fn city_selector(ui: &mut Ui, state: &mut AppState, cities: &[String]) {
    caption(ui, "Select City");

    let current = state.filters.city.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("select_city")
        .selected_text(&current)
        .width(ui.available_width())
        .height(300.0)
        .show_ui(ui, |ui: &mut Ui| {
            for city in cities {
                if ui.selectable_label(current == *city, city).clicked() {
                    state.set_city(city);
                }
            }
        });
}

fn year_selector(ui: &mut Ui, state: &mut AppState) {
    caption(ui, "Select Year");

    let (lo, hi) = state.config.year_bounds;
    let (mut start, mut end) = state.filters.years;

    let from = ui.add(egui::Slider::new(&mut start, lo..=hi).text("from"));
    let to = ui.add(egui::Slider::new(&mut end, lo..=hi).text("to"));

    if from.changed() || to.changed() {
        // Keep the handles from crossing: the one being dragged pushes the other.
        if from.changed() && start > end {
            end = start;
        } else if to.changed() && end < start {
            start = end;
        }
        state.set_year_range(start, end);
    }
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
            ui.separator();
            let has_table = !state.pivot.is_empty();
            if ui
                .add_enabled(has_table, egui::Button::new("Export table as CSV…"))
                .clicked()
            {
                export_dialog(state, ExportFormat::Csv);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_table, egui::Button::new("Export chart data as JSON…"))
                .clicked()
            {
                export_dialog(state, ExportFormat::Json);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} order lines loaded, {} selected",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if state.edited {
            ui.separator();
            if ui.button("Reset edits").clicked() {
                state.reset_edits();
            }
        }

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
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

enum ExportFormat {
    Csv,
    Json,
}

fn export_dialog(state: &mut AppState, format: ExportFormat) {
    let (name, ext) = match format {
        ExportFormat::Csv => ("sales_by_date.csv", "csv"),
        ExportFormat::Json => ("sales_by_date.json", "json"),
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export")
        .set_file_name(name)
        .add_filter(ext, &[ext])
        .save_file()
    else {
        return;
    };

    match format {
        ExportFormat::Csv => state.export_csv(&path),
        ExportFormat::Json => state.export_json(&path),
    }
}
