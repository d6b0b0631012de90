use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::export::{write_melted_json, write_pivot_csv};
use crate::data::filter::{city_year_indices, filtered_indices, FilterState};
use crate::data::loader::load_file;
use crate::data::metrics::{metric_cards, MetricCard};
use crate::data::model::SalesDataset;
use crate::data::pivot::{pivot_sales, PivotTable};
use crate::data::DataError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<SalesDataset>,

    /// Sidebar selections.
    pub filters: FilterState,

    /// Indices of order lines passing every filter (cached).
    pub visible_indices: Vec<usize>,

    /// Editable pivot of the visible rows. Rebuilt, discarding edits,
    /// whenever the filters change.
    pub pivot: PivotTable,

    /// Whether `pivot` differs from the freshly computed table.
    pub edited: bool,

    pub metrics: Vec<MetricCard>,

    pub color_map: ColorMap,

    /// Date chosen in the table's "add row" picker.
    pub new_row_date: NaiveDate,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dataset: None,
            filters: FilterState {
                categories: Default::default(),
                city: None,
                years: (0, 0),
            },
            visible_indices: Vec::new(),
            pivot: PivotTable::default(),
            edited: false,
            metrics: Vec::new(),
            color_map: ColorMap::default(),
            new_row_date: NaiveDate::from_ymd_opt(config.default_years.1, 1, 1).unwrap_or_default(),
            status_message: None,
            config,
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.filters = FilterState::initial(&dataset, &self.config);
        self.color_map = ColorMap::new(&dataset.categories);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a file and install it, reporting failures in the status line.
    pub fn open_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} contains no order lines", path.display());
                }
                log::info!(
                    "Loaded {} order lines from {} ({} categories, {} cities, years {:?})",
                    dataset.len(),
                    path.display(),
                    dataset.categories.len(),
                    dataset.cities.len(),
                    dataset.year_span()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute visible rows, pivot (dropping edits) and metric cards.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.filters);
        self.pivot = pivot_sales(ds, &self.visible_indices);
        self.edited = false;

        let city_year = city_year_indices(ds, &self.filters);
        self.metrics = metric_cards(ds, &city_year, &self.config.metrics);

        log::debug!(
            "filters {:?}: {} rows, {} pivot rows",
            self.filters,
            self.visible_indices.len(),
            self.pivot.rows.len()
        );
    }

    // -- filter mutations --

    /// Toggle a single category in the multi-select.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.filters.categories.remove(category) {
            self.filters.categories.insert(category.to_string());
        }
        self.refresh();
    }

    pub fn select_all_categories(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.categories = ds.categories.iter().cloned().collect();
            self.refresh();
        }
    }

    pub fn clear_categories(&mut self) {
        self.filters.categories.clear();
        self.refresh();
    }

    pub fn set_city(&mut self, city: &str) {
        if self.filters.city.as_deref() != Some(city) {
            self.filters.city = Some(city.to_string());
            self.refresh();
        }
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let before = self.filters.years;
        self.filters.set_years(start, end);
        if self.filters.years != before {
            self.refresh();
        }
    }

    // -- table edits --

    pub fn edit_cell(&mut self, row: usize, col: usize, value: f64) -> Result<(), DataError> {
        self.pivot.set_value(row, col, value)?;
        self.edited = true;
        Ok(())
    }

    pub fn add_row(&mut self, date: NaiveDate) -> usize {
        self.edited = true;
        self.pivot.add_row(date)
    }

    pub fn remove_row(&mut self, row: usize) -> Result<(), DataError> {
        self.pivot.remove_row(row)?;
        self.edited = true;
        Ok(())
    }

    /// Discard edits by recomputing the table from the filtered rows.
    pub fn reset_edits(&mut self) {
        self.refresh();
    }

    // -- export --

    pub fn export_csv(&mut self, path: &Path) {
        let result = create(path).and_then(|f| write_pivot_csv(&self.pivot, f));
        self.report_export(path, result);
    }

    pub fn export_json(&mut self, path: &Path) {
        let result = create(path).and_then(|f| write_melted_json(&self.pivot, f));
        self.report_export(path, result);
    }

    fn report_export(&mut self, path: &Path, result: Result<(), DataError>) {
        match result {
            Ok(()) => {
                log::info!("Exported table to {}", path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, DataError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
}
