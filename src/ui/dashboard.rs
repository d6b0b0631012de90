use eframe::egui::{self, Align, Color32, Frame, Layout, RichText, ScrollArea, Ui};

use crate::data::metrics::{DeltaColor, DeltaDirection, MetricCard};
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Central panel – the dashboard page
// ---------------------------------------------------------------------------

/// Render the whole page: header, metric cards, editable table and chart.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📊 Sample Store Data Explorer");
            about(ui);
            ui.add_space(8.0);

            if state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a file to explore sales  (File → Open…)");
                });
                return;
            }

            metric_row(ui, &state.metrics);
            ui.add_space(8.0);

            ui.heading("Which Category performs ($) best at the Sample Store?");
            table::pivot_editor(ui, state);
            ui.add_space(8.0);
            plot::sales_chart(ui, state);

            footer(ui, &state.config.footer);
        });
}

fn about(ui: &mut Ui) {
    egui::CollapsingHeader::new("About this app")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.strong("What can this app do?");
            ui.label(
                RichText::new(
                    "This app shows data wrangling on a sales table, an editable \
                     pivot for data interaction and a line chart that follows your edits.",
                )
                .color(Color32::from_rgb(0x1C, 0x83, 0xE1)),
            );
            ui.strong("How to use the app?");
            ui.label(
                RichText::new(
                    "To engage with the app, 1. Select Category of your interest in the \
                     sidebar and then 2. Select the year duration from the slider widget. \
                     As a result, this should generate an updated editable table and line plot.",
                )
                .color(Color32::from_rgb(0xC9, 0x8A, 0x00)),
            );
        });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_row(ui: &mut Ui, cards: &[MetricCard]) {
    if cards.is_empty() {
        return;
    }
    ui.columns(cards.len(), |columns: &mut [Ui]| {
        for (col, card) in columns.iter_mut().zip(cards) {
            metric_card(col, card);
        }
    });
}

fn metric_card(ui: &mut Ui, card: &MetricCard) {
    Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(&card.label);
        ui.label(RichText::new(&card.value).size(28.0).strong())
            .on_hover_text(format!("${:.2}", card.total));
        if !card.delta.is_empty() {
            let direction = card.direction();
            let arrow = match direction {
                DeltaDirection::Up => "⬆",
                DeltaDirection::Down => "⬇",
                DeltaDirection::Flat => "",
            };
            ui.label(
                RichText::new(format!("{arrow} {}", card.delta).trim_start())
                    .color(delta_color(card.delta_color, direction)),
            );
        }
    });
}

pub fn delta_color(mode: DeltaColor, direction: DeltaDirection) -> Color32 {
    let good = Color32::from_rgb(0x09, 0xAB, 0x3B);
    let bad = Color32::from_rgb(0xFF, 0x2B, 0x2B);
    match (mode, direction) {
        (DeltaColor::Off, _) | (_, DeltaDirection::Flat) => Color32::GRAY,
        (DeltaColor::Normal, DeltaDirection::Up) | (DeltaColor::Inverse, DeltaDirection::Down) => {
            good
        }
        (DeltaColor::Normal, DeltaDirection::Down) | (DeltaColor::Inverse, DeltaDirection::Up) => {
            bad
        }
    }
}

fn footer(ui: &mut Ui, text: &str) {
    if text.is_empty() {
        return;
    }
    ui.add_space(12.0);
    ui.with_layout(Layout::top_down(Align::Center), |ui: &mut Ui| {
        ui.label(text);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_colours() {
        let up = DeltaDirection::Up;
        let down = DeltaDirection::Down;
        assert_eq!(delta_color(DeltaColor::Off, up), Color32::GRAY);
        assert_eq!(delta_color(DeltaColor::Normal, DeltaDirection::Flat), Color32::GRAY);
        assert_eq!(
            delta_color(DeltaColor::Normal, up),
            delta_color(DeltaColor::Inverse, down)
        );
        assert_ne!(
            delta_color(DeltaColor::Normal, up),
            delta_color(DeltaColor::Normal, down)
        );
    }
}
