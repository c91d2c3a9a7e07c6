//! Synthetic (N, Bias) source.
//!
//! Bias is drawn from the closed-form Dirichlet model fitted in the paper,
//!
//!   delta(N) = -0.092 + 0.0254·χ3 + 0.0109·χ5 + 0.0071·χ7 - 0.0096·χ3χ5
//!
//! plus Gaussian noise. N values are even by construction: a uniform draw U
//! is doubled, so a half-range [lo/2, hi/2) yields even N covering [lo, hi).
//! Fixed seed ⇒ fixed sample set, the reproducibility contract of every run.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

use crate::characters::chi_slice;
use crate::{AnalysisError, Sample};

/// Closed-form Dirichlet bias model with additive Gaussian noise.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BiasModel {
    pub intercept: f64,
    pub chi3: f64,
    pub chi5: f64,
    pub chi7: f64,
    pub chi3_chi5: f64,
    /// Noise standard deviation; 0.0 makes the simulation deterministic.
    pub noise_sigma: f64,
}

impl BiasModel {
    /// The coefficients fitted in the second-main-term paper.
    pub fn paper(noise_sigma: f64) -> Self {
        BiasModel {
            intercept: -0.092,
            chi3: 0.0254,
            chi5: 0.0109,
            chi7: 0.0071,
            chi3_chi5: -0.0096,
            noise_sigma,
        }
    }
}

impl Default for BiasModel {
    fn default() -> Self {
        BiasModel::paper(0.02)
    }
}

/// Draw `count` even integers in [2·half_lo, 2·half_hi).
pub fn generate_even_ns(count: usize, half_lo: u64, half_hi: u64, rng: &mut StdRng) -> Vec<u64> {
    (0..count).map(|_| 2 * rng.gen_range(half_lo..half_hi)).collect()
}

/// The even-N magnitude window [10^exp, 10^(exp+0.5)) as (lo, hi).
///
/// Exponents up to 16 stay well inside u64.
pub fn decade_window(exponent: u32) -> (u64, u64) {
    let lo = 10u64.pow(exponent);
    let hi = (lo as f64 * 10f64.sqrt()) as u64;
    (lo, hi)
}

/// Evaluate the noise-free model at each N.
pub fn model_bias(ns: &[u64], model: &BiasModel) -> Result<Vec<f64>, AnalysisError> {
    let chi3 = chi_slice(ns, 3)?;
    let chi5 = chi_slice(ns, 5)?;
    let chi7 = chi_slice(ns, 7)?;

    Ok((0..ns.len())
        .map(|i| {
            let (c3, c5, c7) = (chi3[i] as f64, chi5[i] as f64, chi7[i] as f64);
            model.intercept
                + model.chi3 * c3
                + model.chi5 * c5
                + model.chi7 * c7
                + model.chi3_chi5 * c3 * c5
        })
        .collect())
}

/// Simulate (N, Bias) samples: model bias plus Gaussian noise.
pub fn simulate_samples(
    ns: &[u64],
    model: &BiasModel,
    rng: &mut StdRng,
) -> Result<Vec<Sample>, AnalysisError> {
    let deltas = model_bias(ns, model)?;
    let add_noise = model.noise_sigma > 0.0;

    Ok(ns
        .iter()
        .zip(deltas)
        .map(|(&n, delta)| {
            let bias = if add_noise {
                // Scaled standard normal: no fallible distribution constructor.
                let z: f64 = StandardNormal.sample(rng);
                delta + model.noise_sigma * z
            } else {
                delta
            };
            Sample { n, bias }
        })
        .collect())
}
