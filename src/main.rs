mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SampleStoreApp;
use clap::Parser;
use config::{CliArgs, DashboardConfig};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let config = DashboardConfig::load(args.config.as_deref())
        .context("loading dashboard configuration")?
        .with_args(&args);

    let mut state = AppState::new(config);
    let data_path = state.config.data_path.clone();
    if data_path.exists() {
        state.open_path(&data_path);
    } else {
        log::warn!("data file {} not found", data_path.display());
        state.status_message = Some(format!(
            "{} not found, use File → Open…",
            data_path.display()
        ));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sample Store Data Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(SampleStoreApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
