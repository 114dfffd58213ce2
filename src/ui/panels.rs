use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::PlotKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset and plot controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.label("Select your options to generate visualizations");
    ui.separator();

    // ---- Dataset ----
    ui.strong("Dataset");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("CSV separator");
        ui.add(egui::TextEdit::singleline(&mut state.separator).desired_width(32.0));
    });
    if ui.button("Open CSV / Excel…").clicked() {
        open_file_dialog(state);
    }
    if state.default_source.is_some()
        && ui
            .add_enabled(!state.default_loaded, egui::Button::new("Use default dataset"))
            .clicked()
    {
        state.load_default();
    }
    ui.separator();

    if state.dataset.is_none() {
        ui.label("Open a dataset or load the default one to start exploring.");
        return;
    }

    // ---- Plot selection ----
    ui.strong("Visualization options");
    let previous_kind = state.plot_kind;
    egui::ComboBox::from_id_salt("plot_kind")
        .selected_text(state.plot_kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in PlotKind::ALL {
                ui.selectable_value(&mut state.plot_kind, kind, kind.label());
            }
        });
    if state.plot_kind != previous_kind {
        state.sync_selection();
    }

    let (first_label, second_label) = match state.plot_kind {
        PlotKind::TwoWayCount => ("Column 1", Some("Column 2")),
        PlotKind::CategoricalCount | PlotKind::CategoricalShare => ("Categorical column", None),
        _ => ("Numerical column", None),
    };

    if state.plot_kind.selection_count() > 0 {
        let options = state.column_options().to_vec();
        column_combo(ui, "first_column", first_label, &options, &mut state.primary_column);
        if let Some(label) = second_label {
            column_combo(ui, "second_column", label, &options, &mut state.secondary_column);
        }
        if options.is_empty() {
            ui.label(RichText::new("No suitable columns in this dataset").italics());
        }
    }

    ui.add_space(8.0);
    if ui.button("Generate plot").clicked() {
        state.generate_plot();
    }
}

fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: &mut Option<String>,
) {
    ui.label(label);
    let current = selected.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                if ui.selectable_label(current == *col, col.as_str()).clicked() {
                    *selected = Some(col.clone());
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if state.default_source.is_some() && ui.button("Use default dataset").clicked() {
                state.load_default();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} rows × {} columns",
                state.source_name.as_deref().unwrap_or("dataset"),
                ds.len(),
                ds.columns().len()
            ));
        }

        ui.separator();

        if ui
            .add_enabled(state.chart.is_some(), egui::Button::new("Copy chart JSON"))
            .clicked()
        {
            if let Some(json) = state.chart_json() {
                ui.ctx().copy_text(json);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter(
            "Supported files",
            &["csv", "tsv", "txt", "xlsx", "xlsm", "xls", "xlsb", "ods", "json", "parquet", "pq"],
        )
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
