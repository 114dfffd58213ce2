//! IQR-based outlier replacement.

use serde::Serialize;

use super::summary::{quantile_sorted, sorted_finite};
use crate::error::{DashboardError, Result};

/// Fence distance from the quartiles in multiples of the IQR.
pub const FENCE_COEF: f64 = 1.5;

/// Robust bounds of a numeric column. Derived per call and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
    pub median: f64,
}

impl OutlierBounds {
    /// Compute quartiles, fences and median over the finite values.
    ///
    /// Fails with [`DashboardError::InvalidColumn`] when nothing is left
    /// after dropping missing values.
    pub fn compute(values: &[f64]) -> Result<Self> {
        let sorted = sorted_finite(values);
        let (Some(q1), Some(median), Some(q3)) = (
            quantile_sorted(&sorted, 0.25),
            quantile_sorted(&sorted, 0.5),
            quantile_sorted(&sorted, 0.75),
        ) else {
            return Err(DashboardError::InvalidColumn(
                "column has no numeric values".to_string(),
            ));
        };

        let iqr = q3 - q1;
        Ok(OutlierBounds {
            q1,
            q3,
            iqr,
            lower: q1 - FENCE_COEF * iqr,
            upper: q3 + FENCE_COEF * iqr,
            median,
        })
    }

    /// Whether `value` lies strictly outside the fences. NaN never does.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Replace every value outside these fences with the median.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&v| if self.is_outlier(v) { self.median } else { v })
            .collect()
    }
}

/// Replace every value outside the IQR fences with the column median.
///
/// The output has the same length as the input; in-fence values and missing
/// values (NaN) are passed through untouched. With a zero IQR the fences
/// collapse onto a single point and every other value is replaced.
///
/// The renderer calls [`OutlierBounds::apply`] directly so it can keep the
/// bounds it draws.
#[allow(dead_code)]
pub fn normalize(values: &[f64]) -> Result<Vec<f64>> {
    Ok(OutlierBounds::compute(values)?.apply(values))
}
