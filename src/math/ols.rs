//! Least squares line fit.
//!
//! The bundle carries a precomputed regression of digital spend on internet
//! penetration. It is displayed as-is; this module only refits the same
//! scatter so diagnostics can confirm the artifact is consistent with its own
//! points.
//!
//! We solve with SVD rather than the normal equations. The design matrix is
//! tall (one row per year, two columns), and nalgebra's `QR::solve` expects a
//! square system.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Ordinary least squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit a straight line through `(x, y)` pairs.
///
/// `None` when the inputs differ in length, have fewer than two points, or
/// all `x` are equal.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len();

    // Columns are centred so the solve is well conditioned even when x and y
    // differ by many orders of magnitude.
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    if x.iter().all(|v| (v - mean_x).abs() < f64::EPSILON) {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] - mean_x });
    let target = DVector::from_iterator(n, y.iter().map(|v| v - mean_y));
    let beta = solve_least_squares(&design, &target)?;

    let slope = beta[1];
    let intercept = mean_y + beta[0] - slope * mean_x;

    let fitted = &design * &beta;
    let ss_res: f64 = (&target - fitted).iter().map(|r| r * r).sum();
    let ss_tot: f64 = target.iter().map(|d| d * d).sum();
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(LineFit { slope, intercept, r2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_exact() {
        let fit = fit_line(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_line_degenerate() {
        assert!(fit_line(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(fit_line(&[1.0], &[2.0]).is_none());
    }

    #[test]
    fn refit_matches_embedded_regression() {
        let ds = crate::dataset::Dataset::embedded().unwrap();
        let reg = ds.regression();
        let fit = fit_line(&reg.x_scatter, &reg.y_scatter).unwrap();
        assert!((fit.slope - reg.slope).abs() / reg.slope.abs() < 1e-6);
        assert!((fit.intercept - reg.intercept).abs() / reg.intercept.abs() < 1e-6);
        assert!((fit.r2 - reg.r2).abs() < 1e-3);
    }
}
