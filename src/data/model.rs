use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};

/// Header names of the columns the explorer reads. Anything else in the
/// source file is ignored.
pub const ORDER_DATE: &str = "Order Date";
pub const CATEGORY: &str = "Category";
pub const CITY: &str = "City";
pub const SALES: &str = "Sales";

// ---------------------------------------------------------------------------
// OrderLine – one row of the source file
// ---------------------------------------------------------------------------

/// A single order line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub order_date: NaiveDate,
    pub category: String,
    pub city: String,
    pub sales: f64,
}

impl OrderLine {
    pub fn year(&self) -> i32 {
        self.order_date.year()
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed option lists for the filters.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All order lines, in file order.
    pub orders: Vec<OrderLine>,
    /// Unique categories in order of first appearance.
    pub categories: Vec<String>,
    /// Unique cities, sorted.
    pub cities: BTreeSet<String>,
    /// Unique order years, sorted.
    pub years: BTreeSet<i32>,
}

impl SalesDataset {
    /// Build the option lists from the loaded order lines.
    pub fn from_orders(orders: Vec<OrderLine>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut categories = Vec::new();
        let mut cities = BTreeSet::new();
        let mut years = BTreeSet::new();

        for order in &orders {
            if seen.insert(order.category.as_str()) {
                categories.push(order.category.clone());
            }
            cities.insert(order.city.clone());
            years.insert(order.year());
        }

        SalesDataset {
            orders,
            categories,
            cities,
            years,
        }
    }

    /// Number of order lines.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// First and last order year, if any rows were loaded.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }
}

#[cfg(test)]
pub(crate) fn order(date: &str, category: &str, city: &str, sales: f64) -> OrderLine {
    OrderLine {
        order_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: category.to_string(),
        city: city.to_string(),
        sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_keep_first_appearance_order() {
        let ds = SalesDataset::from_orders(vec![
            order("2021-01-02", "Technology", "Seattle", 10.0),
            order("2021-01-03", "Furniture", "Austin", 5.0),
            order("2022-03-01", "Technology", "Boston", 1.0),
            order("2023-05-09", "Office Supplies", "Austin", 2.0),
        ]);

        assert_eq!(
            ds.categories,
            vec!["Technology", "Furniture", "Office Supplies"]
        );
        assert_eq!(
            ds.cities.iter().collect::<Vec<_>>(),
            vec!["Austin", "Boston", "Seattle"]
        );
        assert_eq!(ds.year_span(), Some((2021, 2023)));
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn empty_dataset_has_no_year_span() {
        let ds = SalesDataset::from_orders(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_span(), None);
    }
}
