use std::fmt;

use crate::data::model::ColumnKind;

// ---------------------------------------------------------------------------
// PlotKind – what the selector offers
// ---------------------------------------------------------------------------

/// The seven visualization types, without their column parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    CategoricalCount,
    CategoricalShare,
    NumericHistogram,
    NumericDensity,
    NumericSpread,
    CorrelationMatrix,
    TwoWayCount,
}

impl PlotKind {
    pub const ALL: [PlotKind; 7] = [
        PlotKind::CategoricalCount,
        PlotKind::CategoricalShare,
        PlotKind::NumericHistogram,
        PlotKind::NumericDensity,
        PlotKind::NumericSpread,
        PlotKind::CorrelationMatrix,
        PlotKind::TwoWayCount,
    ];

    /// Short name shown in the plot-type selector.
    pub fn label(self) -> &'static str {
        match self {
            PlotKind::CategoricalCount => "bar",
            PlotKind::CategoricalShare => "pie",
            PlotKind::NumericHistogram => "hist",
            PlotKind::NumericDensity => "dist",
            PlotKind::NumericSpread => "boxplot",
            PlotKind::CorrelationMatrix => "heatmap",
            PlotKind::TwoWayCount => "crosstab",
        }
    }

    /// Column type the selector should offer, `None` for the heatmap which
    /// always uses every numeric column.
    pub fn column_kind(self) -> Option<ColumnKind> {
        match self {
            PlotKind::CategoricalCount | PlotKind::CategoricalShare | PlotKind::TwoWayCount => {
                Some(ColumnKind::Categorical)
            }
            PlotKind::NumericHistogram | PlotKind::NumericDensity | PlotKind::NumericSpread => {
                Some(ColumnKind::Numeric)
            }
            PlotKind::CorrelationMatrix => None,
        }
    }

    /// Number of columns the user must pick.
    pub fn selection_count(self) -> usize {
        match self {
            PlotKind::CorrelationMatrix => 0,
            PlotKind::TwoWayCount => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlotKind::CategoricalCount => "categorical-count",
            PlotKind::CategoricalShare => "categorical-share",
            PlotKind::NumericHistogram => "numeric-histogram",
            PlotKind::NumericDensity => "numeric-density",
            PlotKind::NumericSpread => "numeric-spread",
            PlotKind::CorrelationMatrix => "correlation-matrix",
            PlotKind::TwoWayCount => "two-way-count",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// PlotRequest – a kind together with its column selection
// ---------------------------------------------------------------------------

/// A fully specified chart request. Each variant carries only the columns it
/// needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlotRequest {
    CategoricalCount { column: String },
    CategoricalShare { column: String },
    NumericHistogram { column: String },
    NumericDensity { column: String },
    NumericSpread { column: String },
    CorrelationMatrix,
    TwoWayCount { rows: String, columns: String },
}

impl PlotRequest {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotRequest::CategoricalCount { .. } => PlotKind::CategoricalCount,
            PlotRequest::CategoricalShare { .. } => PlotKind::CategoricalShare,
            PlotRequest::NumericHistogram { .. } => PlotKind::NumericHistogram,
            PlotRequest::NumericDensity { .. } => PlotKind::NumericDensity,
            PlotRequest::NumericSpread { .. } => PlotKind::NumericSpread,
            PlotRequest::CorrelationMatrix => PlotKind::CorrelationMatrix,
            PlotRequest::TwoWayCount { .. } => PlotKind::TwoWayCount,
        }
    }

    /// Assemble a request from a kind and up to two selected column names.
    ///
    /// Returns `None` when the kind needs a column that was not supplied.
    pub fn from_selection(
        kind: PlotKind,
        first: Option<&str>,
        second: Option<&str>,
    ) -> Option<Self> {
        let one = || first.map(str::to_string);
        Some(match kind {
            PlotKind::CategoricalCount => PlotRequest::CategoricalCount { column: one()? },
            PlotKind::CategoricalShare => PlotRequest::CategoricalShare { column: one()? },
            PlotKind::NumericHistogram => PlotRequest::NumericHistogram { column: one()? },
            PlotKind::NumericDensity => PlotRequest::NumericDensity { column: one()? },
            PlotKind::NumericSpread => PlotRequest::NumericSpread { column: one()? },
            PlotKind::CorrelationMatrix => PlotRequest::CorrelationMatrix,
            PlotKind::TwoWayCount => PlotRequest::TwoWayCount {
                rows: one()?,
                columns: second?.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_builds_matching_request() {
        for kind in PlotKind::ALL {
            let request = PlotRequest::from_selection(kind, Some("a"), Some("b")).unwrap();
            assert_eq!(request.kind(), kind);
        }
    }

    #[test]
    fn missing_columns_yield_no_request() {
        assert_eq!(
            PlotRequest::from_selection(PlotKind::NumericSpread, None, None),
            None
        );
        assert_eq!(
            PlotRequest::from_selection(PlotKind::TwoWayCount, Some("a"), None),
            None
        );
        assert_eq!(
            PlotRequest::from_selection(PlotKind::CorrelationMatrix, None, None),
            Some(PlotRequest::CorrelationMatrix)
        );
    }
}
