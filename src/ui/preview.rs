use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, Dataset};

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

/// Show the first rows of the dataset as a table.
pub fn dataset_preview(ui: &mut Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    if columns.is_empty() {
        ui.label("The dataset has no columns.");
        return;
    }
    let rows = dataset.len().min(PREVIEW_ROWS);

    egui::ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(TableColumn::auto().at_least(60.0), columns.len())
                .header(20.0, |mut header| {
                    for col in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for i in 0..rows {
                        body.row(18.0, |mut row| {
                            for col in columns {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell_text(&col.values[i]));
                                });
                            }
                        });
                    }
                });
        });
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => "NaN".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_render_as_nan() {
        assert_eq!(cell_text(&CellValue::Null), "NaN");
        assert_eq!(cell_text(&CellValue::Integer(42)), "42");
        assert_eq!(cell_text(&CellValue::String("admin".into())), "admin");
    }
}
