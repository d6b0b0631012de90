use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::model::SalesDataset;
use super::{DataError, Result};

// ---------------------------------------------------------------------------
// PivotTable – sales by order date (rows) and category (columns)
// ---------------------------------------------------------------------------

/// One row of the pivot: an order date and one summed value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub date: NaiveDate,
    /// Same length and order as [`PivotTable::categories`].
    pub values: Vec<f64>,
}

/// Editable wide table. Rows stay sorted by date through every edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub categories: Vec<String>,
    pub rows: Vec<PivotRow>,
}

/// Long-form record produced by [`PivotTable::melt`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeltedPoint {
    pub order_date: NaiveDate,
    pub category: String,
    pub sales: f64,
}

/// All points of one category, in row order, for a single chart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Sum `Sales` by `Order Date` × `Category` over the given rows.
///
/// Columns are the categories present in `indices`, sorted; cells with no
/// matching rows are 0.
pub fn pivot_sales(dataset: &SalesDataset, indices: &[usize]) -> PivotTable {
    let categories: Vec<String> = indices
        .iter()
        .map(|&i| dataset.orders[i].category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: BTreeMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let order = &dataset.orders[i];
        let values = by_date
            .entry(order.order_date)
            .or_insert_with(|| vec![0.0; categories.len()]);
        values[column[order.category.as_str()]] += order.sales;
    }

    PivotTable {
        rows: by_date
            .into_iter()
            .map(|(date, values)| PivotRow { date, values })
            .collect(),
        categories,
    }
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row)?.values.get(col).copied()
    }

    /// Overwrite a single cell.
    pub fn set_value(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let n_rows = self.rows.len();
        let n_cols = self.categories.len();
        let r = self.rows.get_mut(row).ok_or(DataError::OutOfRange {
            what: "row",
            index: row,
            len: n_rows,
        })?;
        let cell = r.values.get_mut(col).ok_or(DataError::OutOfRange {
            what: "column",
            index: col,
            len: n_cols,
        })?;
        *cell = value;
        Ok(())
    }

    /// Insert a zero-filled row, keeping the rows ordered by date. Returns
    /// the index of the new row. Duplicate dates are allowed and the new row
    /// goes after existing rows with the same date.
    pub fn add_row(&mut self, date: NaiveDate) -> usize {
        let at = self.rows.partition_point(|r| r.date <= date);
        self.rows.insert(
            at,
            PivotRow {
                date,
                values: vec![0.0; self.categories.len()],
            },
        );
        at
    }

    pub fn remove_row(&mut self, row: usize) -> Result<PivotRow> {
        if row >= self.rows.len() {
            return Err(DataError::OutOfRange {
                what: "row",
                index: row,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(row))
    }

    /// Sum of one category column.
    pub fn column_total(&self, col: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.values.get(col))
            .sum()
    }

    /// Unpivot to long form: every category column in turn, each walking
    /// the rows top to bottom.
    pub fn melt(&self) -> Vec<MeltedPoint> {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(col, category)| {
                self.rows.iter().map(move |r| MeltedPoint {
                    order_date: r.date,
                    category: category.clone(),
                    sales: r.values[col],
                })
            })
            .collect()
    }

    /// Melted points grouped into one line per category.
    pub fn series(&self) -> Vec<CategorySeries> {
        let mut out: Vec<CategorySeries> = self
            .categories
            .iter()
            .map(|c| CategorySeries {
                category: c.clone(),
                points: Vec::with_capacity(self.rows.len()),
            })
            .collect();

        for point in self.melt() {
            if let Some(s) = out.iter_mut().find(|s| s.category == point.category) {
                s.points.push((point.order_date, point.sales));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::order;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table() -> PivotTable {
        let ds = SalesDataset::from_orders(vec![
            order("2021-03-02", "Technology", "Seattle", 10.0),
            order("2021-01-05", "Furniture", "Seattle", 4.0),
            order("2021-03-02", "Technology", "Seattle", 5.5),
            order("2021-01-05", "Technology", "Seattle", 1.0),
            order("2022-01-01", "Office Supplies", "Seattle", 99.0),
        ]);
        pivot_sales(&ds, &[0, 1, 2, 3])
    }

    #[test]
    fn pivot_sums_and_fills_zero() {
        let t = table();
        assert_eq!(t.categories, vec!["Furniture", "Technology"]);
        assert_eq!(t.dates(), vec![d("2021-01-05"), d("2021-03-02")]);
        assert_eq!(t.rows[0].values, vec![4.0, 1.0]);
        assert_eq!(t.rows[1].values, vec![0.0, 15.5]);
        assert_eq!(t.column_total(1), 16.5);
    }

    #[test]
    fn pivot_of_nothing_is_empty() {
        let ds = SalesDataset::from_orders(vec![order("2021-01-01", "Furniture", "Austin", 1.0)]);
        let t = pivot_sales(&ds, &[]);
        assert!(t.is_empty());
        assert!(t.categories.is_empty());
        assert!(t.melt().is_empty());
    }

    #[test]
    fn melt_is_column_major() {
        let t = table();
        let melted = t.melt();
        assert_eq!(melted.len(), 4);
        assert_eq!(
            melted
                .iter()
                .map(|p| (p.category.as_str(), p.sales))
                .collect::<Vec<_>>(),
            vec![
                ("Furniture", 4.0),
                ("Furniture", 0.0),
                ("Technology", 1.0),
                ("Technology", 15.5),
            ]
        );
    }

    #[test]
    fn edits_flow_into_series() {
        let mut t = table();
        t.set_value(1, 0, 42.0).unwrap();
        let at = t.add_row(d("2021-02-01"));
        assert_eq!(at, 1);
        t.set_value(at, 1, 7.0).unwrap();

        let series = t.series();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].points,
            vec![
                (d("2021-01-05"), 4.0),
                (d("2021-02-01"), 0.0),
                (d("2021-03-02"), 42.0),
            ]
        );
        assert_eq!(series[1].points[1], (d("2021-02-01"), 7.0));

        let removed = t.remove_row(0).unwrap();
        assert_eq!(removed.date, d("2021-01-05"));
        assert_eq!(t.rows.len(), 2);
    }

    #[test]
    fn duplicate_date_goes_after_existing_row() {
        let mut t = table();
        assert_eq!(t.add_row(d("2021-01-05")), 1);
        assert_eq!(t.rows[1].values, vec![0.0, 0.0]);
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let mut t = table();
        assert!(matches!(
            t.set_value(9, 0, 1.0),
            Err(DataError::OutOfRange { what: "row", index: 9, len: 2 })
        ));
        assert!(matches!(
            t.set_value(0, 5, 1.0),
            Err(DataError::OutOfRange { what: "column", .. })
        ));
        assert!(t.remove_row(2).is_err());
    }
}
