//! Backend-agnostic chart recipes.
//!
//! A [`ChartSpec`] holds the titles and the aggregated arrays a renderer
//! needs; nothing in here knows about egui.

use serde::Serialize;

use crate::stats::outlier::OutlierBounds;
use crate::stats::summary::{BoxSummary, Histogram};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    /// Single-panel bar chart of category counts.
    CategoryBars(CategoryCounts),
    /// Single-panel pie chart of category shares.
    Pie(PieChart),
    /// Two panels: the raw column and its outlier-cleaned copy.
    BeforeAfter(BeforeAfter),
    /// Annotated correlation matrix.
    Heatmap(CorrelationHeatmap),
    /// Contingency table drawn as grouped bars.
    GroupedBars(Contingency),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::CategoryBars(c) => &c.title,
            ChartSpec::Pie(p) => &p.title,
            ChartSpec::BeforeAfter(b) => &b.column,
            ChartSpec::Heatmap(h) => &h.title,
            ChartSpec::GroupedBars(g) => &g.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub title: String,
    pub column: String,
    /// Category labels in order of first appearance.
    pub categories: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub column: String,
    /// Labels sorted by count, largest first.
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
    /// `counts` normalized to sum to one.
    pub shares: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeforeAfter {
    pub column: String,
    /// Fences used to build the cleaned panel.
    pub bounds: OutlierBounds,
    pub before: NumericPanel,
    pub after: NumericPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericPanel {
    pub title: String,
    pub view: NumericView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum NumericView {
    Histogram(Histogram),
    Density {
        histogram: Histogram,
        /// `[x, y]` points of the density curve scaled to histogram counts.
        kde: Vec<[f64; 2]>,
    },
    Spread(BoxSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationHeatmap {
    pub title: String,
    pub columns: Vec<String>,
    /// Row-major `columns.len()²` matrix; `None` where undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contingency {
    pub title: String,
    pub row_column: String,
    pub column_column: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[r][c]` joint occurrences of `row_labels[r]` and `column_labels[c]`.
    pub counts: Vec<Vec<u64>>,
}

impl Contingency {
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}
