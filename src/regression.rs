//! Ordinary least squares of bias on the character features.
//!
//! Fits Bias ≈ c0 + Σ c_i · feature_i by solving the normal equations with
//! Gaussian elimination (partial pivoting, f64). With ±1 features the 7×7
//! system is tiny and well conditioned whenever the design has full rank; a
//! pivot below `PIVOT_EPS` means a feature is constant or an exact linear
//! combination of others, and the fit fails as rank-deficient rather than
//! falling back to a minimum-norm solution.

use serde::Serialize;

use crate::features::{FeatureMatrix, FEATURE_NAMES};
use crate::AnalysisError;

const PIVOT_EPS: f64 = 1e-10;

/// Fitted Dirichlet character model.
#[derive(Debug, Clone, Serialize)]
pub struct DirichletFit {
    /// Intercept c0.
    pub intercept: f64,
    /// Coefficients aligned with `FEATURE_NAMES`.
    pub coefficients: [f64; 6],
    /// In-sample R² = 1 - SS_res/SS_tot.
    pub r_squared: f64,
    /// Rows that survived the coprimality filter.
    pub n_used: usize,
    /// Rows before filtering.
    pub n_total: usize,
}

/// Fit the six-feature model with intercept.
///
/// Errors: `InsufficientData` if no rows survived the coprimality filter,
/// `SingularDesign` if the normal equations are rank-deficient.
pub fn fit_dirichlet_model(matrix: &FeatureMatrix) -> Result<DirichletFit, AnalysisError> {
    let n = matrix.num_rows();
    if n == 0 {
        return Err(AnalysisError::InsufficientData(matrix.total_input));
    }

    // Normal equations over [1 | X]: A c = b with A = X'X, b = X'y.
    const K: usize = 7;
    let mut a = [[0.0f64; K]; K];
    let mut b = [0.0f64; K];

    for (row, &y) in matrix.rows.iter().zip(matrix.targets.iter()) {
        let mut x = [1.0f64; K];
        x[1..].copy_from_slice(row);
        for i in 0..K {
            for j in 0..K {
                a[i][j] += x[i] * x[j];
            }
            b[i] += x[i] * y;
        }
    }

    let coeffs = solve_linear_system(&mut a, &mut b)?;

    // In-sample goodness of fit.
    let y_mean = matrix.targets.iter().sum::<f64>() / n as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (row, &y) in matrix.rows.iter().zip(matrix.targets.iter()) {
        let mut pred = coeffs[0];
        for (c, x) in coeffs[1..].iter().zip(row.iter()) {
            pred += c * x;
        }
        ss_res += (y - pred).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }
    let r_squared = if ss_tot < 1e-12 { 1.0 } else { 1.0 - ss_res / ss_tot };

    let mut coefficients = [0.0f64; 6];
    coefficients.copy_from_slice(&coeffs[1..]);

    Ok(DirichletFit {
        intercept: coeffs[0],
        coefficients,
        r_squared,
        n_used: n,
        n_total: matrix.total_input,
    })
}

/// Solve A x = b in place by Gaussian elimination with partial pivoting.
fn solve_linear_system(a: &mut [[f64; 7]; 7], b: &mut [f64; 7]) -> Result<[f64; 7], AnalysisError> {
    const K: usize = 7;

    for col in 0..K {
        // Largest remaining entry in this column as pivot.
        let mut pivot_row = col;
        for r in col + 1..K {
            if a[r][col].abs() > a[pivot_row][col].abs() {
                pivot_row = r;
            }
        }
        if a[pivot_row][col].abs() < PIVOT_EPS {
            let what = if col == 0 {
                "intercept column".to_string()
            } else {
                format!("feature '{}' adds no independent information", FEATURE_NAMES[col - 1])
            };
            return Err(AnalysisError::SingularDesign(what));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for r in col + 1..K {
            let factor = a[r][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..K {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = [0.0f64; K];
    for row in (0..K).rev() {
        let mut acc = b[row];
        for c in row + 1..K {
            acc -= a[row][c] * x[c];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}

/// Print the regression report: goodness of fit, intercept, labeled coefficients.
pub fn print_regression_report(fit: &DirichletFit) {
    println!("{}", "=".repeat(60));
    println!("Dirichlet Character Regression Results");
    println!("{}", "=".repeat(60));
    println!();
    println!("Samples: {} coprime to 105 (of {})", fit.n_used, fit.n_total);
    println!("R² Score: {:.4}", fit.r_squared);
    println!("Intercept (c0): {:+.5}", fit.intercept);
    println!();
    println!("Fitted Coefficients:");
    for (name, coef) in FEATURE_NAMES.iter().zip(fit.coefficients.iter()) {
        println!("  {:<8}: {:+.6}", name, coef);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::build_features;
    use crate::characters::chi;
    use crate::Sample;

    /// Noiseless bias = c0 + a·chi3 + b·chi5 must be recovered exactly.
    #[test]
    fn test_recovers_planted_coefficients() {
        let (c0, a3, a5) = (-0.09, 0.025, 0.011);
        let samples: Vec<Sample> = (1..5000u64)
            .filter(|n| n % 3 != 0 && n % 5 != 0 && n % 7 != 0)
            .map(|n| {
                let bias = c0
                    + a3 * chi(n, 3).unwrap() as f64
                    + a5 * chi(n, 5).unwrap() as f64;
                Sample { n, bias }
            })
            .collect();

        let fit = fit_dirichlet_model(&build_features(&samples).unwrap()).unwrap();
        assert!((fit.intercept - c0).abs() < 1e-8, "intercept {}", fit.intercept);
        assert!((fit.coefficients[0] - a3).abs() < 1e-8);
        assert!((fit.coefficients[1] - a5).abs() < 1e-8);
        for &c in &fit.coefficients[2..] {
            assert!(c.abs() < 1e-8, "phantom coefficient {}", c);
        }
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_data() {
        let samples: Vec<Sample> = (1..=5u64).map(|k| Sample { n: 105 * k, bias: 0.0 }).collect();
        let err = fit_dirichlet_model(&build_features(&samples).unwrap()).unwrap_err();
        match err {
            AnalysisError::InsufficientData(n) => assert_eq!(n, 5),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_singular_design_detected() {
        // A single repeated N gives identical rows: rank 1, far from full rank.
        let samples: Vec<Sample> = (0..50).map(|_| Sample { n: 11, bias: 1.0 }).collect();
        let err = fit_dirichlet_model(&build_features(&samples).unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::SingularDesign(_)), "got {:?}", err);
    }

    #[test]
    fn test_constant_target_r_squared() {
        // Constant y with a full-rank design: SS_tot = 0 is treated as perfect fit.
        let samples: Vec<Sample> = (1..2000u64)
            .filter(|n| n % 3 != 0 && n % 5 != 0 && n % 7 != 0)
            .map(|n| Sample { n, bias: 0.5 })
            .collect();
        let fit = fit_dirichlet_model(&build_features(&samples).unwrap()).unwrap();
        assert!((fit.intercept - 0.5).abs() < 1e-8);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }
}
