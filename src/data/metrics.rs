use serde::{Deserialize, Serialize};

use super::model::SalesDataset;

/// How a metric's delta text is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaColor {
    /// Positive deltas green, negative red.
    #[default]
    Normal,
    /// Positive deltas red, negative green.
    Inverse,
    /// Always grey.
    Off,
}

/// Direction of a delta string such as `"1.2%"` or `"-0.5%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaDirection {
    Up,
    Down,
    Flat,
}

/// Which category a card sums and how it is labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub label: String,
    pub category: String,
    #[serde(default)]
    pub delta: String,
    #[serde(default)]
    pub delta_color: DeltaColor,
}

impl MetricConfig {
    pub fn new(label: &str, category: &str, delta: &str, delta_color: DeltaColor) -> Self {
        Self {
            label: label.to_string(),
            category: category.to_string(),
            delta: delta.to_string(),
            delta_color,
        }
    }
}

/// A rendered metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: String,
    pub total: f64,
    /// `"$"` followed by [`format_number`] of the total.
    pub value: String,
    pub delta: String,
    pub delta_color: DeltaColor,
}

impl MetricCard {
    pub fn direction(&self) -> DeltaDirection {
        delta_direction(&self.delta)
    }
}

pub fn delta_direction(delta: &str) -> DeltaDirection {
    let t = delta.trim();
    let magnitude: f64 = t
        .trim_start_matches(['+', '-'])
        .trim_end_matches('%')
        .trim()
        .parse()
        .unwrap_or(0.0);
    if magnitude == 0.0 {
        DeltaDirection::Flat
    } else if t.starts_with('-') {
        DeltaDirection::Down
    } else {
        DeltaDirection::Up
    }
}

/// Total sales of `category` among the given rows.
pub fn category_total(dataset: &SalesDataset, indices: &[usize], category: &str) -> f64 {
    indices
        .iter()
        .map(|&i| &dataset.orders[i])
        .filter(|o| o.category == category)
        .map(|o| o.sales)
        .sum()
}

/// Compact money figure. Above one million: floored millions for exact
/// multiples, otherwise millions rounded to one decimal. Below: floored
/// thousands. Quotients always print with one decimal ("12.0 K", "3.0 M").
pub fn format_number(num: f64) -> String {
    if num > 1_000_000.0 {
        if num % 1_000_000.0 == 0.0 {
            return format!("{:.1} M", (num / 1_000_000.0).floor());
        }
        return format!("{:.1} M", num / 1_000_000.0);
    }
    format!("{:.1} K", (num / 1000.0).floor())
}

/// Build one card per configured metric from the rows of the current city and year range.
pub fn metric_cards(
    dataset: &SalesDataset,
    indices: &[usize],
    configs: &[MetricConfig],
) -> Vec<MetricCard> {
    configs
        .iter()
        .map(|metric| {
            let total = category_total(dataset, indices, &metric.category);
            MetricCard {
                label: metric.label.clone(),
                total,
                value: format!("${}", format_number(total)),
                delta: metric.delta.clone(),
                delta_color: metric.delta_color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::order;

    #[test]
    fn format_thresholds() {
        assert_eq!(format_number(0.0), "0.0 K");
        assert_eq!(format_number(999.99), "0.0 K");
        assert_eq!(format_number(12_345.6), "12.0 K");
        assert_eq!(format_number(1_000_000.0), "1000.0 K");
        assert_eq!(format_number(3_000_000.0), "3.0 M");
        assert_eq!(format_number(2_345_678.0), "2.3 M");
    }

    #[test]
    fn cards_sum_per_category() {
        let ds = SalesDataset::from_orders(vec![
            order("2021-01-01", "Furniture", "Seattle", 1500.0),
            order("2021-01-02", "Furniture", "Seattle", 700.0),
            order("2021-01-03", "Technology", "Seattle", 25_000.0),
            order("2021-01-04", "Technology", "Austin", 1_000_000.0),
        ]);
        let metrics = vec![
            MetricConfig::new("Furniture Sales", "Furniture", "1.2%", DeltaColor::Normal),
            MetricConfig::new("Office Supplies Sales", "Office Supplies", "0.0%", DeltaColor::Off),
            MetricConfig::new("Technology Sales", "Technology", "-0.5%", DeltaColor::Normal),
        ];

        let cards = metric_cards(&ds, &[0, 1, 2], &metrics);
        assert_eq!(cards[0].value, "$2.0 K");
        assert_eq!(cards[0].total, 2200.0);
        assert_eq!(cards[1].value, "$0.0 K");
        assert_eq!(cards[1].delta_color, DeltaColor::Off);
        assert_eq!(cards[2].value, "$25.0 K");
        assert_eq!(cards[2].direction(), DeltaDirection::Down);
    }

    #[test]
    fn delta_directions() {
        assert_eq!(delta_direction("1.2%"), DeltaDirection::Up);
        assert_eq!(delta_direction("+3%"), DeltaDirection::Up);
        assert_eq!(delta_direction("0.0%"), DeltaDirection::Flat);
        assert_eq!(delta_direction("-0.5%"), DeltaDirection::Down);
        assert_eq!(delta_direction(""), DeltaDirection::Flat);
    }
}
