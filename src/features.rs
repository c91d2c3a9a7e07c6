//! Design matrix for the Dirichlet character regression.
//!
//! Six features per sample: χ3, χ5, χ7 and the three pairwise products.
//! Only samples with all three characters nonzero (gcd(N, 105) = 1) enter the
//! matrix; for everything else at least one feature would be 0 and the model
//! is not identified there. Pure function: callers keep their samples, the
//! builder returns a fresh matrix.

use serde::Serialize;

use crate::characters::chi_slice;
use crate::{AnalysisError, Sample};

/// Regression feature labels, aligned with `FeatureMatrix` columns and the
/// fitted coefficient order.
pub const FEATURE_NAMES: [&str; 6] = ["chi3", "chi5", "chi7", "chi3_5", "chi3_7", "chi5_7"];

/// Coprimality-filtered design matrix and target vector.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureMatrix {
    /// One row per surviving sample, input order preserved.
    pub rows: Vec<[f64; 6]>,
    /// Bias values aligned with `rows`.
    pub targets: Vec<f64>,
    /// Size of the unfiltered input, for error reporting.
    pub total_input: usize,
}

impl FeatureMatrix {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Build the 6-column design from (N, Bias) samples, dropping every sample
/// that shares a factor with 105.
pub fn build_features(samples: &[Sample]) -> Result<FeatureMatrix, AnalysisError> {
    let ns: Vec<u64> = samples.iter().map(|s| s.n).collect();
    let chi3 = chi_slice(&ns, 3)?;
    let chi5 = chi_slice(&ns, 5)?;
    let chi7 = chi_slice(&ns, 7)?;

    let mut rows = Vec::with_capacity(samples.len());
    let mut targets = Vec::with_capacity(samples.len());

    for (i, sample) in samples.iter().enumerate() {
        let (c3, c5, c7) = (chi3[i], chi5[i], chi7[i]);
        if c3 == 0 || c5 == 0 || c7 == 0 {
            continue;
        }
        let (c3, c5, c7) = (c3 as f64, c5 as f64, c7 as f64);
        rows.push([c3, c5, c7, c3 * c5, c3 * c7, c5 * c7]);
        targets.push(sample.bias);
    }

    Ok(FeatureMatrix {
        rows,
        targets,
        total_input: samples.len(),
    })
}
