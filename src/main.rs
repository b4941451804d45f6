//! Sea The Truth - Marine Pollution Dashboard
//!
//! Aggregates microplastic density measurements and ocean plastic emissions
//! into interactive charts, with PPT and JSON export.

mod charts;
mod config;
mod data;
mod gui;
mod ppt;
mod report;
mod stats;

use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use gui::SeaTruthApp;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Sea The Truth"),
        ..Default::default()
    };

    eframe::run_native(
        "Sea The Truth",
        options,
        Box::new(|cc| Ok(Box::new(SeaTruthApp::new(cc, config)))),
    )
}
