use chrono::NaiveDate;
use eframe::egui::Ui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Sales line chart (below the table)
// ---------------------------------------------------------------------------

/// Label for a nominal x position: the date of that table row, or nothing
/// between rows and outside the table.
pub fn date_label(dates: &[NaiveDate], x: f64) -> Option<String> {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    dates
        .get(rounded as usize)
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Render one line per category from the (possibly edited) pivot table.
///
/// Order dates are nominal: row `i` of the table sits at `x = i`, so dates
/// are evenly spaced regardless of the gaps between them.
pub fn sales_chart(ui: &mut Ui, state: &AppState) {
    let series = state.pivot.series();
    if series.is_empty() {
        ui.label("No sales for the current selection.");
        return;
    }

    let dates = state.pivot.dates();
    let axis_dates = dates.clone();
    let hover_dates = dates;

    Plot::new("sales_chart")
        .legend(Legend::default())
        .height(state.config.chart_height)
        .x_axis_label("Order Date")
        .y_axis_label("Gross earnings ($)")
        .x_axis_formatter(move |mark: GridMark, _range| {
            date_label(&axis_dates, mark.value).unwrap_or_default()
        })
        .label_formatter(move |name, point| {
            let date = date_label(&hover_dates, point.x.round()).unwrap_or_default();
            if name.is_empty() {
                format!("{date}\n${:.2}", point.y)
            } else {
                format!("{name}\n{date}\n${:.2}", point.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for s in &series {
                let points: PlotPoints = s
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, &(_, sales))| [i as f64, sales])
                    .collect();

                let line = Line::new(points)
                    .name(&s.category)
                    .color(state.color_map.color_for(&s.category))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
