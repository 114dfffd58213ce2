use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EdaApp {
    pub state: AppState,
}

impl EdaApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset and plot controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
            });

        // ---- Central panel: preview and chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Exploratory Data Analysis");

            let Some(dataset) = &self.state.dataset else {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a CSV, Excel, JSON or Parquet file to get started.");
                });
                return;
            };

            egui::CollapsingHeader::new(format!(
                "Data preview (first {} rows)",
                preview::PREVIEW_ROWS
            ))
            .default_open(true)
            .show(ui, |ui| {
                preview::dataset_preview(ui, dataset);
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("chart_scroll")
                .show(ui, |ui| {
                    plot::chart_view(ui, &self.state);
                });
        });
    }
}
