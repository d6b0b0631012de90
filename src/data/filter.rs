use std::collections::BTreeSet;

use super::model::{OrderLine, SalesDataset};
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Filter predicate: the three sidebar selections
// ---------------------------------------------------------------------------

/// Current sidebar selection.
///
/// * `categories` – multi-select; an empty set selects nothing.
/// * `city` – single select; `None` selects nothing.
/// * `years` – inclusive `(start, end)` range from the slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub categories: BTreeSet<String>,
    pub city: Option<String>,
    pub years: (i32, i32),
}

impl FilterState {
    /// Initial selection for a freshly loaded dataset. Configured defaults
    /// that do not occur in the data are dropped.
    pub fn initial(dataset: &SalesDataset, config: &DashboardConfig) -> Self {
        let categories: BTreeSet<String> = config
            .default_categories
            .iter()
            .filter(|c| dataset.categories.contains(c))
            .cloned()
            .collect();
        if categories.len() < config.default_categories.len() {
            log::warn!(
                "default categories {:?} not all present in data",
                config.default_categories
            );
        }

        let city = config
            .default_city
            .as_ref()
            .filter(|c| dataset.cities.contains(*c))
            .cloned()
            .or_else(|| {
                if let Some(c) = &config.default_city {
                    log::warn!("default city {c:?} not present in data");
                }
                dataset.cities.first().cloned()
            });

        let (lo, hi) = config.year_bounds;
        let (start, end) = config.default_years;

        FilterState {
            categories,
            city,
            years: normalise_years(start.clamp(lo, hi), end.clamp(lo, hi)),
        }
    }

    /// Whether an order line passes the city and year predicates.
    pub fn matches_city_year(&self, order: &OrderLine) -> bool {
        let Some(city) = &self.city else {
            return false;
        };
        let (start, end) = self.years;
        order.city.contains(city.as_str()) && (start..=end).contains(&order.year())
    }

    /// Whether an order line passes all three predicates.
    pub fn matches(&self, order: &OrderLine) -> bool {
        self.categories.contains(&order.category) && self.matches_city_year(order)
    }

    pub fn set_years(&mut self, start: i32, end: i32) {
        self.years = normalise_years(start, end);
    }
}

fn normalise_years(start: i32, end: i32) -> (i32, i32) {
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Return indices of order lines that pass every sidebar filter.
pub fn filtered_indices(dataset: &SalesDataset, filter: &FilterState) -> Vec<usize> {
    indices_where(dataset, |o| filter.matches(o))
}

/// Return indices of order lines in the selected city and year range,
/// regardless of category. The metric cards are computed from these.
pub fn city_year_indices(dataset: &SalesDataset, filter: &FilterState) -> Vec<usize> {
    indices_where(dataset, |o| filter.matches_city_year(o))
}

fn indices_where(dataset: &SalesDataset, pred: impl Fn(&OrderLine) -> bool) -> Vec<usize> {
    dataset
        .orders
        .iter()
        .enumerate()
        .filter(|(_, o)| pred(o))
        .map(|(i, _)| i)
        .collect()
}
