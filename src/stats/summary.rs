use serde::Serialize;

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Finite values of `values`, sorted ascending.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Linear-interpolation quantile of an already sorted slice (NumPy's default
/// `linear` method: position `(n - 1) * q`).
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let pos = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    if a == b {
        return Some(a);
    }
    let diff = b - a;
    if diff.is_finite() {
        Some(a + frac * diff)
    } else {
        // opposite signs near the f64 limits
        Some(a * (1.0 - frac) + b * frac)
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bucketed frequencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins spanning their range.
    ///
    /// Non-finite values are ignored. The last bin is closed on the right.
    /// A zero-width range is widened to `[v - 0.5, v + 0.5]` like NumPy.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let sorted = sorted_finite(values);
        let bins = bins.max(1);
        let (mut lo, mut hi) = match (sorted.first(), sorted.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 1.0),
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        // a span wider than f64::MAX is binned at half scale
        let scale = if (hi - lo).is_finite() { 1.0 } else { 0.5 };
        let (lo_s, hi_s) = (lo * scale, hi * scale);
        let width = (hi_s - lo_s) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins)
            .map(|i| (lo_s + width * i as f64) / scale)
            .collect();
        edges[0] = lo;
        edges[bins] = hi;
        let mut counts = vec![0u64; bins];
        for v in &sorted {
            let idx = (((v * scale - lo_s) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Histogram { edges, counts }
    }

    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// Midpoint of every bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Upper limit for [`auto_bin_count`].
pub const MAX_AUTO_BINS: usize = 1_000;

/// Bin count for NumPy's `bins="auto"`: the smaller of the Sturges and
/// Freedman–Diaconis bin widths, falling back to Sturges when the IQR is zero.
///
/// A single extreme value can push the Freedman–Diaconis count into the
/// billions; past [`MAX_AUTO_BINS`] the Sturges count is used instead.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let sorted = sorted_finite(values);
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let sturges_bins = ((n as f64).log2() + 1.0).ceil() as usize;
    let range = sorted[n - 1] - sorted[0];
    if range == 0.0 {
        return 1;
    }
    if !range.is_finite() {
        return sturges_bins;
    }

    let sturges = range / ((n as f64).log2() + 1.0);
    let iqr = match (quantile_sorted(&sorted, 0.75), quantile_sorted(&sorted, 0.25)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = (range / width).ceil();
    if !bins.is_finite() || bins > MAX_AUTO_BINS as f64 {
        log::debug!("Automatic binning wants {bins} bins, using Sturges ({sturges_bins})");
        return sturges_bins.min(MAX_AUTO_BINS);
    }
    (bins as usize).max(1)
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Number of points at which the density curve is evaluated.
pub const KDE_GRID_POINTS: usize = 200;

/// Gaussian kernel density estimate with Scott's bandwidth
/// (`sample std · n^(-1/5)`), evaluated on an even grid over the data range.
///
/// Returns `[x, density]` pairs, or an empty curve when the estimate is
/// undefined (fewer than two points, or zero variance).
pub fn gaussian_kde(values: &[f64], grid_points: usize) -> Vec<[f64; 2]> {
    let data = sorted_finite(values);
    let n = data.len();
    if n < 2 || grid_points < 2 {
        return Vec::new();
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    if bandwidth <= 0.0 || !bandwidth.is_finite() {
        return Vec::new();
    }

    let lo = data[0];
    let hi = data[n - 1];
    let step = (hi - lo) / (grid_points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..grid_points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = data
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            [x, density * norm]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Whisker reach in multiples of the IQR.
pub const WHISKER_COEF: f64 = 1.5;

/// Five-number summary as drawn by a box plot, plus the points beyond the
/// whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub fliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarize the finite values; `None` when there are none.
    ///
    /// Whiskers sit on the most extreme data points still within
    /// `WHISKER_COEF · IQR` of the box.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - WHISKER_COEF * iqr;
        let hi_fence = q3 + WHISKER_COEF * iqr;

        let inside = sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            fliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&[7.0], 0.9), Some(7.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn histogram_counts_every_finite_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, f64::NAN];
        let hist = Histogram::compute(&values, 10);
        assert_eq!(hist.edges.len(), 11);
        assert_eq!(hist.total(), 11);
        // the maximum lands in the closed last bin
        assert_eq!(hist.counts[9], 2);
        assert!((hist.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_of_constant_values_is_widened() {
        let hist = Histogram::compute(&[3.0, 3.0, 3.0], 10);
        assert_eq!(hist.edges.first(), Some(&2.5));
        assert_eq!(hist.edges.last(), Some(&3.5));
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn auto_bins_follow_sturges_for_small_samples() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        // Sturges is ~2.08 wide, Freedman-Diaconis ~4.18
        assert_eq!(auto_bin_count(&values), 5);
        assert_eq!(auto_bin_count(&[1.0, 1.0]), 1);
    }

    #[test]
    fn quantiles_survive_opposite_extremes() {
        let sorted = [-1.7e308, 1.7e308];
        let q1 = quantile_sorted(&sorted, 0.25).unwrap();
        let median = quantile_sorted(&sorted, 0.5).unwrap();
        assert!(q1.is_finite() && median.is_finite());
        assert!((q1 + 0.85e308).abs() < 1e295);
        assert_eq!(median, 0.0);
    }

    #[test]
    fn auto_bins_fall_back_to_sturges_for_extreme_outliers() {
        let mut values: Vec<f64> = (1..=100).map(f64::from).collect();
        values.push(1e12);
        // log2(101) + 1 rounds up to 8
        assert_eq!(auto_bin_count(&values), 8);

        values.push(-1.7e308);
        values.push(1.7e308);
        assert!(auto_bin_count(&values) <= MAX_AUTO_BINS);
    }

    #[test]
    fn histogram_spanning_the_whole_f64_range_has_finite_edges() {
        let values = [-1.7e308, 0.0, 1.0, 1.7e308];
        let hist = Histogram::compute(&values, 8);
        assert!(hist.edges.iter().all(|e| e.is_finite()), "{:?}", hist.edges);
        assert!(hist.edges.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[7], 1);
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let values: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
        let curve = gaussian_kde(&values, KDE_GRID_POINTS);
        assert_eq!(curve.len(), KDE_GRID_POINTS);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        // truncated to the data range, so a little mass is missing
        assert!(area > 0.7 && area < 1.05, "area = {area}");
    }

    #[test]
    fn kde_is_empty_without_spread() {
        assert!(gaussian_kde(&[2.0, 2.0, 2.0], KDE_GRID_POINTS).is_empty());
        assert!(gaussian_kde(&[2.0], KDE_GRID_POINTS).is_empty());
    }

    #[test]
    fn box_summary_separates_fliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = BoxSummary::compute(&values).unwrap();
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.fliers, vec![100.0]);
        assert!(BoxSummary::compute(&[f64::NAN]).is_none());
    }
}
