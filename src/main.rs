mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod stats;
mod ui;

use app::EdaApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting with {cli:?}");

    let state = AppState::new(cli.default_source(), cli.separator_text());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty EDA – Data Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(EdaApp::new(state)))),
    )
}
