use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::request::{PlotKind, PlotRequest};
use super::spec::{
    BeforeAfter, CategoryCounts, ChartSpec, Contingency, CorrelationHeatmap, NumericPanel,
    NumericView, PieChart,
};
use crate::data::model::{CellValue, Column, ColumnKind, Dataset};
use crate::error::{DashboardError, Result};
use crate::stats::correlation::correlation_matrix;
use crate::stats::outlier::OutlierBounds;
use crate::stats::summary::{
    auto_bin_count, gaussian_kde, BoxSummary, Histogram, KDE_GRID_POINTS,
};

/// Categorical charts with more distinct values than this are skipped.
pub const MAX_CATEGORIES: usize = 12;

/// Bin count of the plain histogram view.
pub const HISTOGRAM_BINS: usize = 10;

/// Turn a plot request into a chart recipe.
///
/// `Ok(None)` means the chart was deliberately skipped (a categorical column
/// with more than [`MAX_CATEGORIES`] distinct values). The dataset is only
/// borrowed; cleaned columns live and die inside this call.
pub fn render(request: &PlotRequest, dataset: &Dataset) -> Result<Option<ChartSpec>> {
    if dataset.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }
    let kind = request.kind();

    match request {
        PlotRequest::CategoricalCount { column } => {
            let column = categorical(dataset, kind, column)?;
            Ok(category_bars(column).map(ChartSpec::CategoryBars))
        }
        PlotRequest::CategoricalShare { column } => {
            let column = categorical(dataset, kind, column)?;
            Ok(pie(column).map(ChartSpec::Pie))
        }
        PlotRequest::NumericHistogram { column }
        | PlotRequest::NumericDensity { column }
        | PlotRequest::NumericSpread { column } => {
            numeric(dataset, kind, column)?;
            let raw = dataset.numeric_values(column)?;
            before_after(kind, column, &raw).map(|b| Some(ChartSpec::BeforeAfter(b)))
        }
        PlotRequest::CorrelationMatrix => heatmap(dataset).map(|h| Some(ChartSpec::Heatmap(h))),
        PlotRequest::TwoWayCount { rows, columns } => {
            let rows = categorical(dataset, kind, rows)?;
            let cols = categorical(dataset, kind, columns)?;
            Ok(Some(ChartSpec::GroupedBars(crosstab(rows, cols))))
        }
    }
}

// -- column checks --

fn require_kind<'a>(
    dataset: &'a Dataset,
    kind: PlotKind,
    name: &str,
    wanted: ColumnKind,
) -> Result<&'a Column> {
    let column = dataset.require(name)?;
    if column.kind != wanted {
        let (is, needs) = match wanted {
            ColumnKind::Numeric => ("categorical", "a numeric"),
            ColumnKind::Categorical => ("numeric", "a categorical"),
        };
        return Err(DashboardError::UnsupportedCombination {
            kind,
            reason: format!("'{name}' is {is}, {needs} column is required"),
        });
    }
    Ok(column)
}

fn categorical<'a>(dataset: &'a Dataset, kind: PlotKind, name: &str) -> Result<&'a Column> {
    require_kind(dataset, kind, name, ColumnKind::Categorical)
}

fn numeric<'a>(dataset: &'a Dataset, kind: PlotKind, name: &str) -> Result<&'a Column> {
    require_kind(dataset, kind, name, ColumnKind::Numeric)
}

// -- categorical charts --

/// Counts per distinct non-null value, in order of first appearance.
fn value_counts(column: &Column) -> IndexMap<&CellValue, u64> {
    let mut counts: IndexMap<&CellValue, u64> = IndexMap::new();
    for value in column.present() {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

fn category_bars(column: &Column) -> Option<CategoryCounts> {
    let counts = value_counts(column);
    if counts.len() > MAX_CATEGORIES {
        log::debug!(
            "Skipping bar plot of '{}': {} distinct values",
            column.name,
            counts.len()
        );
        return None;
    }
    Some(CategoryCounts {
        title: format!("Bar Plot of {}", column.name),
        column: column.name.clone(),
        categories: counts.keys().map(|v| v.to_string()).collect(),
        counts: counts.values().copied().collect(),
    })
}

fn pie(column: &Column) -> Option<PieChart> {
    let mut counts: Vec<(&CellValue, u64)> = value_counts(column).into_iter().collect();
    if counts.len() > MAX_CATEGORIES {
        log::debug!(
            "Skipping pie chart of '{}': {} distinct values",
            column.name,
            counts.len()
        );
        return None;
    }
    // stable: ties keep first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total: u64 = counts.iter().map(|(_, n)| n).sum();
    let shares = counts
        .iter()
        .map(|(_, n)| if total == 0 { 0.0 } else { *n as f64 / total as f64 })
        .collect();
    Some(PieChart {
        title: format!("Pie Chart of {}", column.name),
        column: column.name.clone(),
        labels: counts.iter().map(|(v, _)| v.to_string()).collect(),
        counts: counts.iter().map(|(_, n)| *n).collect(),
        shares,
    })
}

// -- numeric before/after charts --

fn before_after(kind: PlotKind, column: &str, raw: &[f64]) -> Result<BeforeAfter> {
    let bounds = OutlierBounds::compute(raw)?;
    let cleaned = bounds.apply(raw);
    let view = |values: &[f64]| -> NumericView {
        let present: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        match kind {
            PlotKind::NumericDensity => density_view(&present),
            PlotKind::NumericSpread => match BoxSummary::compute(&present) {
                Some(summary) => NumericView::Spread(summary),
                None => NumericView::Histogram(Histogram::compute(&present, HISTOGRAM_BINS)),
            },
            _ => NumericView::Histogram(Histogram::compute(&present, HISTOGRAM_BINS)),
        }
    };

    Ok(BeforeAfter {
        column: column.to_string(),
        bounds,
        before: NumericPanel {
            title: format!("{column} (Before Outliers)"),
            view: view(raw),
        },
        after: NumericPanel {
            title: format!("{column} (After Outliers)"),
            view: view(&cleaned),
        },
    })
}

/// Histogram with automatic binning plus a KDE curve scaled to counts.
fn density_view(values: &[f64]) -> NumericView {
    let histogram = Histogram::compute(values, auto_bin_count(values));
    let scale = values.len() as f64 * histogram.bin_width();
    let kde = gaussian_kde(values, KDE_GRID_POINTS)
        .into_iter()
        .map(|[x, y]| [x, y * scale])
        .collect();
    NumericView::Density { histogram, kde }
}

// -- correlation --

fn heatmap(dataset: &Dataset) -> Result<CorrelationHeatmap> {
    let columns = dataset.numeric_columns();
    if columns.is_empty() {
        return Err(DashboardError::UnsupportedCombination {
            kind: PlotKind::CorrelationMatrix,
            reason: "the dataset has no numeric columns".to_string(),
        });
    }
    let data = columns
        .iter()
        .map(|name| dataset.numeric_values(name))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorrelationHeatmap {
        title: "Correlation Heatmap".to_string(),
        values: correlation_matrix(&data),
        columns,
    })
}

// -- cross-tabulation --

fn crosstab(rows: &Column, cols: &Column) -> Contingency {
    let mut cells: BTreeMap<(&CellValue, &CellValue), u64> = BTreeMap::new();
    let mut row_keys: BTreeMap<&CellValue, usize> = BTreeMap::new();
    let mut col_keys: BTreeMap<&CellValue, usize> = BTreeMap::new();

    for (r, c) in rows.values.iter().zip(&cols.values) {
        if r.is_null() || c.is_null() {
            continue;
        }
        *cells.entry((r, c)).or_insert(0) += 1;
        row_keys.insert(r, 0);
        col_keys.insert(c, 0);
    }
    // assign sorted positions
    for (i, slot) in row_keys.values_mut().enumerate() {
        *slot = i;
    }
    for (i, slot) in col_keys.values_mut().enumerate() {
        *slot = i;
    }

    let mut counts = vec![vec![0u64; col_keys.len()]; row_keys.len()];
    for ((r, c), n) in &cells {
        counts[row_keys[r]][col_keys[c]] = *n;
    }

    Contingency {
        title: format!("{} vs {}", rows.name, cols.name),
        row_column: rows.name.clone(),
        column_column: cols.name.clone(),
        row_labels: row_keys.keys().map(|v| v.to_string()).collect(),
        column_labels: col_keys.keys().map(|v| v.to_string()).collect(),
        counts,
    }
}
