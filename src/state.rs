use std::path::Path;

use crate::chart::{render, ChartSpec, PlotKind, PlotRequest};
use crate::data::loader::{parse_separator, DatasetSource, LoadOptions};
use crate::data::model::{ColumnKind, Dataset};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One interactive session, independent of rendering.
///
/// Every UI callback receives this by reference; nothing is shared across
/// sessions.
pub struct AppState {
    /// Loaded dataset (None until the user loads a file).
    pub dataset: Option<Dataset>,

    /// Name of the file the dataset came from.
    pub source_name: Option<String>,

    /// Numeric column names of `dataset`, in order of appearance.
    pub numeric_columns: Vec<String>,

    /// Categorical column names of `dataset`, in order of appearance.
    pub categorical_columns: Vec<String>,

    /// Selected visualization type.
    pub plot_kind: PlotKind,

    /// First selected column (the only one for single-column plots).
    pub primary_column: Option<String>,

    /// Second selected column (two-way counts only).
    pub secondary_column: Option<String>,

    /// Separator text for delimited uploads, as typed in the side panel.
    pub separator: String,

    /// Injected default dataset, if configured.
    pub default_source: Option<DatasetSource>,

    /// Whether the default dataset was already loaded in this session.
    pub default_loaded: bool,

    /// Chart produced by the last successful render.
    pub chart: Option<ChartSpec>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_name: None,
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            plot_kind: PlotKind::CategoricalCount,
            primary_column: None,
            secondary_column: None,
            separator: ",".to_string(),
            default_source: None,
            default_loaded: false,
            chart: None,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(default_source: Option<DatasetSource>, separator: String) -> Self {
        Self {
            default_source,
            separator,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and refresh the column classification.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: String) {
        self.numeric_columns = dataset.numeric_columns();
        self.categorical_columns = dataset.categorical_columns();
        log::info!(
            "Loaded '{}': {} rows, {} numeric and {} categorical columns",
            source_name,
            dataset.len(),
            self.numeric_columns.len(),
            self.categorical_columns.len()
        );

        self.dataset = Some(dataset);
        self.source_name = Some(source_name);
        self.primary_column = None;
        self.secondary_column = None;
        self.chart = None;
        self.status_message = None;
        self.sync_selection();
    }

    /// Load a user-picked file with the separator currently typed in the UI.
    ///
    /// On failure the previous dataset stays in place and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        let result = parse_separator(&self.separator)
            .map_err(|e| DashboardError::FileRead {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            })
            .map(|separator| DatasetSource::new(path, LoadOptions { separator }));
        match result {
            Ok(source) => {
                self.load_source(&source);
            }
            Err(e) => self.report(&e),
        }
    }

    /// Load the injected default dataset, once per session.
    pub fn load_default(&mut self) {
        if self.default_loaded {
            log::debug!("Default dataset already loaded, ignoring request");
            return;
        }
        let Some(source) = self.default_source.clone() else {
            self.status_message = Some("No default dataset configured".to_string());
            return;
        };
        if self.load_source(&source) {
            self.default_loaded = true;
        }
    }

    fn load_source(&mut self, source: &DatasetSource) -> bool {
        match source.read() {
            Ok(dataset) => {
                self.set_dataset(dataset, source.display_name());
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Columns the selector offers for the current plot kind.
    pub fn column_options(&self) -> &[String] {
        match self.plot_kind.column_kind() {
            Some(ColumnKind::Numeric) => &self.numeric_columns,
            Some(ColumnKind::Categorical) => &self.categorical_columns,
            None => &[],
        }
    }

    /// Keep the selection pointing at columns valid for the plot kind,
    /// falling back to the first candidate.
    pub fn sync_selection(&mut self) {
        let options = self.column_options().to_vec();
        let fix = |slot: &mut Option<String>| {
            let valid = slot.as_ref().is_some_and(|c| options.contains(c));
            if !valid {
                *slot = options.first().cloned();
            }
        };
        fix(&mut self.primary_column);
        fix(&mut self.secondary_column);
    }

    /// The request the current selection describes.
    pub fn plot_request(&self) -> Result<PlotRequest> {
        let kind = self.plot_kind;
        PlotRequest::from_selection(
            kind,
            self.primary_column.as_deref(),
            self.secondary_column.as_deref(),
        )
        .ok_or_else(|| {
            let wanted = match kind.column_kind() {
                Some(ColumnKind::Numeric) => "numeric",
                _ => "categorical",
            };
            DashboardError::UnsupportedCombination {
                kind,
                reason: format!("no {wanted} column selected"),
            }
        })
    }

    /// Render the current selection into `chart`.
    ///
    /// A skipped chart clears `chart` without setting a message.
    pub fn generate_plot(&mut self) {
        self.chart = None;
        self.status_message = None;

        let Some(dataset) = &self.dataset else {
            self.report(&DashboardError::EmptyDataset);
            return;
        };
        let outcome = self
            .plot_request()
            .and_then(|request| render(&request, dataset).map(|chart| (request, chart)));

        match outcome {
            Ok((request, Some(chart))) => {
                log::info!("Rendered {} for {:?}", request.kind(), request);
                self.chart = Some(chart);
            }
            Ok((request, None)) => {
                log::debug!("Nothing to draw for {request:?}");
            }
            Err(e) => self.report(&e),
        }
    }

    /// Current chart as pretty JSON, for the clipboard.
    pub fn chart_json(&self) -> Option<String> {
        let chart = self.chart.as_ref()?;
        match serde_json::to_string_pretty(chart) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to serialize chart: {e}");
                None
            }
        }
    }

    fn report(&mut self, error: &DashboardError) {
        match error {
            DashboardError::FileRead { .. } => log::error!("{error}"),
            _ => log::warn!("{error}"),
        }
        self.status_message = Some(format!("Error: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const BANK: &str = "age;job;marital;balance\n\
        30;admin;married;1787\n\
        33;services;single;4789\n\
        35;management;married;1350\n\
        30;management;single;1476\n\
        59;blue-collar;married;0\n";

    #[test]
    fn loading_refreshes_classification_and_selection() {
        let file = csv_file(BANK);
        let mut state = AppState::new(None, ";".to_string());
        state.load_path(file.path());

        assert!(state.status_message.is_none(), "{:?}", state.status_message);
        assert_eq!(state.numeric_columns, vec!["age", "balance"]);
        assert_eq!(state.categorical_columns, vec!["job", "marital"]);
        assert_eq!(state.primary_column.as_deref(), Some("job"));

        state.plot_kind = PlotKind::NumericSpread;
        state.sync_selection();
        assert_eq!(state.primary_column.as_deref(), Some("age"));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let good = csv_file(BANK);
        let mut state = AppState::new(None, ";".to_string());
        state.load_path(good.path());
        let before = state.dataset.clone();

        let bad = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        state.load_path(bad.path());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset, before);

        state.separator = "::".to_string();
        state.load_path(good.path());
        assert!(state.status_message.as_deref().unwrap().contains("separator"));
        assert_eq!(state.dataset, before);
    }

    #[test]
    fn default_dataset_loads_once() {
        let file = csv_file(BANK);
        let source = DatasetSource::new(file.path(), LoadOptions { separator: b';' });
        let mut state = AppState::new(Some(source), ",".to_string());

        state.load_default();
        assert!(state.default_loaded);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(5));

        // a second request is a no-op even if the session data changed
        state.dataset = None;
        state.load_default();
        assert!(state.dataset.is_none());
    }

    #[test]
    fn missing_default_dataset_is_reported() {
        let mut state = AppState::default();
        state.load_default();
        assert!(!state.default_loaded);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn generates_and_skips_charts() {
        let file = csv_file(BANK);
        let mut state = AppState::new(None, ";".to_string());
        state.load_path(file.path());

        state.plot_kind = PlotKind::TwoWayCount;
        state.sync_selection();
        state.secondary_column = Some("marital".to_string());
        state.generate_plot();
        assert!(matches!(state.chart, Some(ChartSpec::GroupedBars(_))));
        assert!(state.chart_json().unwrap().contains("\"type\": \"grouped_bars\""));

        state.plot_kind = PlotKind::CorrelationMatrix;
        state.generate_plot();
        assert!(matches!(state.chart, Some(ChartSpec::Heatmap(_))));

        // a chart kind whose column list is empty is reported, not drawn
        state.dataset = Some(Dataset::from_rows(vec!["n".into()], vec![vec![
            crate::data::model::CellValue::Integer(1),
        ]]));
        state.categorical_columns.clear();
        state.plot_kind = PlotKind::CategoricalShare;
        state.sync_selection();
        state.generate_plot();
        assert!(state.chart.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("no categorical column"));
    }

    #[test]
    fn without_a_dataset_generation_reports_empty() {
        let mut state = AppState::default();
        state.generate_plot();
        assert!(state.chart.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("no rows"));
    }
}
