//! Error types for dashboard operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::chart::PlotKind;

/// Every recoverable failure the session can report.
///
/// None of these are fatal: the session shows the message and stays
/// interactive with its previous dataset.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The file could not be opened or parsed.
    #[error("Error reading file '{}': {message}", path.display())]
    FileRead { path: PathBuf, message: String },

    /// A numeric operation was asked for on a column it cannot use.
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// The plot kind does not accept the selected column type(s).
    #[error("{kind} cannot be drawn: {reason}")]
    UnsupportedCombination { kind: PlotKind, reason: String },

    /// The dataset has no rows.
    #[error("Dataset has no rows to visualize")]
    EmptyDataset,

    /// The selection names a column the dataset does not have.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
