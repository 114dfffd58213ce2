/// Pearson correlation over the rows where both values are present.
///
/// `None` when fewer than two complete pairs remain or either side has zero
/// variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Symmetric pairwise correlation matrix of `columns`.
///
/// Diagonal cells are exactly `1.0` for any column with spread.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<Option<f64>>> {
    let k = columns.len();
    let mut matrix = vec![vec![None; k]; k];
    for i in 0..k {
        matrix[i][i] = pearson(&columns[i], &columns[i]).map(|_| 1.0);
        for j in (i + 1)..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), Some(1.0));
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), Some(-1.0));
    }

    #[test]
    fn uses_pairwise_complete_rows() {
        let xs = [1.0, 2.0, f64::NAN, 3.0];
        let ys = [2.0, 4.0, 100.0, 6.0];
        assert_eq!(pearson(&xs, &ys), Some(1.0));
    }

    #[test]
    fn undefined_without_spread() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![4.0, 1.0, 3.0, 2.0],
            vec![5.0, 5.0, 5.0, 5.0],
        ];
        let matrix = correlation_matrix(&columns);
        assert_eq!(matrix[0][0], Some(1.0));
        assert_eq!(matrix[1][1], Some(1.0));
        assert_eq!(matrix[2][2], None);
        assert_eq!(matrix[0][1], matrix[1][0]);
        assert_eq!(matrix[0][2], None);
    }
}
