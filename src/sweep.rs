//! Multi-scale persistence analysis of the spectral spread.
//!
//! For each decade exponent e, draw even N from [10^e, 10^(e+0.5)), simulate
//! bias, and record the mod-30 spectral spread. A linear trend of spread
//! against the exponent then asks whether the effect decays with magnitude:
//!
//!   slope ≈ 0, p > α  → "persistent" (no detectable decay)
//!   p ≤ α             → spread decays (or grows) with scale
//!
//! "Persistent" is a failure to reject the zero-slope null at level α, not a
//! proof of persistence.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::mod30::mod30_analysis;
use crate::simulate::{decade_window, generate_even_ns, simulate_samples, BiasModel};
use crate::AnalysisError;

/// Configuration for a multi-scale sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepConfig {
    /// Decade exponents to visit; scale e covers [10^e, 10^(e+0.5)).
    pub exponents: Vec<u32>,
    /// Samples drawn per scale.
    pub samples_per_scale: usize,
    /// Bias model used at every scale.
    pub model: BiasModel,
    /// Base seed; per-scale seeds are derived from it.
    pub seed: u64,
    /// Significance level for the persistence verdict.
    pub alpha: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            exponents: vec![4, 6, 8, 10, 12, 14, 16],
            samples_per_scale: 100_000,
            model: BiasModel::default(),
            seed: 0x601d_bac4_0000_0001,
            alpha: 0.05,
        }
    }
}

/// Spread measured at one magnitude scale.
#[derive(Debug, Clone, Serialize)]
pub struct ScaleRecord {
    pub exponent: u32,
    /// Scale label, e.g. "10^8".
    pub label: String,
    /// Mod-30 spectral spread at this scale, in percentage points.
    pub spread_pct: f64,
    pub n_samples: usize,
}

/// Linear trend of spread vs decade exponent.
#[derive(Debug, Clone, Serialize)]
pub struct TrendFit {
    /// Spread change per decade exponent (percentage points).
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided p-value for slope != 0.
    pub p_value: f64,
    /// Significance level the verdict was taken at.
    pub alpha: f64,
    /// p > alpha: no detectable decay across scales.
    pub persistent: bool,
}

/// Full sweep result.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub scales: Vec<ScaleRecord>,
    pub trend: TrendFit,
}

/// Run the sweep: one spread measurement per exponent, then the trend fit.
/// Each scale's spread is printed as it is measured; the full table and the
/// verdict come from `print_sweep_summary`.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepResult, AnalysisError> {
    let mut scales = Vec::with_capacity(config.exponents.len());

    for &exp in &config.exponents {
        // Independent stream per scale, derived from the base seed.
        let mut rng = StdRng::seed_from_u64(config.seed ^ (exp as u64 * 0x6c62_272e));
        let (lo, hi) = decade_window(exp);
        let ns = generate_even_ns(config.samples_per_scale, lo / 2, hi / 2, &mut rng);
        let samples = simulate_samples(&ns, &config.model, &mut rng)?;
        let summary = mod30_analysis(&samples);

        let label = format!("10^{}", exp);
        println!("{}: spectral spread = {:.2}%", label, summary.spread_pct);

        scales.push(ScaleRecord {
            exponent: exp,
            label,
            spread_pct: summary.spread_pct,
            n_samples: samples.len(),
        });
    }

    let points: Vec<(f64, f64)> = scales
        .iter()
        .map(|s| (s.exponent as f64, s.spread_pct))
        .collect();
    let trend = fit_trend(&points, config.alpha);

    Ok(SweepResult { scales, trend })
}

/// Below this, a residual standard error (or a slope) is indistinguishable
/// from float-summation wobble and treated as exactly zero.
const SE_WOBBLE: f64 = 1e-9;

/// OLS of y on x with a two-sided t-test on the slope.
///
/// Degenerate inputs (fewer than 3 points, zero x-variance, zero slope with
/// zero residual variance) yield p = 1: no evidence against the zero-slope
/// null. A nonzero slope with zero residual variance is the opposite extreme
/// and reports decisive decay.
pub fn fit_trend(points: &[(f64, f64)], alpha: f64) -> TrendFit {
    let n = points.len() as f64;
    if points.len() < 3 {
        return TrendFit {
            slope: 0.0,
            intercept: points.first().map(|p| p.1).unwrap_or(0.0),
            r_squared: 0.0,
            t_statistic: 0.0,
            degrees_of_freedom: 0.0,
            p_value: 1.0,
            alpha,
            persistent: true,
        };
    }

    let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - x_mean).powi(2)).sum();
    let sxy: f64 = points.iter().map(|p| (p.0 - x_mean) * (p.1 - y_mean)).sum();

    if sxx < 1e-12 {
        return TrendFit {
            slope: 0.0,
            intercept: y_mean,
            r_squared: 0.0,
            t_statistic: 0.0,
            degrees_of_freedom: n - 2.0,
            p_value: 1.0,
            alpha,
            persistent: true,
        };
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_res: f64 = points
        .iter()
        .map(|p| (p.1 - (slope * p.0 + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = points.iter().map(|p| (p.1 - y_mean).powi(2)).sum();
    let r_squared = if ss_tot < 1e-12 { 1.0 } else { 1.0 - ss_res / ss_tot };

    let df = n - 2.0;
    let se = (ss_res / df / sxx).sqrt();
    // Residuals down at float-summation wobble: the line fits exactly. A flat
    // exact fit has nothing to reject; a sloped exact fit is decisive decay,
    // so the slope is still tested against the wobble floor.
    if se < SE_WOBBLE {
        if slope.abs() < SE_WOBBLE {
            return TrendFit {
                slope,
                intercept,
                r_squared,
                t_statistic: 0.0,
                degrees_of_freedom: df,
                p_value: 1.0,
                alpha,
                persistent: true,
            };
        }
        let t = slope / SE_WOBBLE;
        let p_value = approximate_two_sided_p(t.abs(), df);
        return TrendFit {
            slope,
            intercept,
            r_squared,
            t_statistic: t,
            degrees_of_freedom: df,
            p_value,
            alpha,
            persistent: p_value > alpha,
        };
    }

    let t = slope / se;
    let p_value = approximate_two_sided_p(t.abs(), df);

    TrendFit {
        slope,
        intercept,
        r_squared,
        t_statistic: t,
        degrees_of_freedom: df,
        p_value,
        alpha,
        persistent: p_value > alpha,
    }
}

/// Approximate two-sided p-value for a t statistic.
///
/// Maps t to an equivalent normal deviate (exact in the df → ∞ limit,
/// widened tails for small df) and doubles the normal tail.
fn approximate_two_sided_p(t_abs: f64, df: f64) -> f64 {
    let z = t_abs * (1.0 - 1.0 / (4.0 * df)) / (1.0 + t_abs * t_abs / (2.0 * df)).sqrt();
    (2.0 * normal_sf(z)).clamp(0.0, 1.0)
}

/// Standard normal survival function P(Z > z).
/// Abramowitz & Stegun approximation 26.2.17.
fn normal_sf(z: f64) -> f64 {
    if z < 0.0 {
        return 1.0 - normal_sf(-z);
    }
    let t = 1.0 / (1.0 + 0.2316419 * z);
    let d = 0.3989422804014327; // 1/sqrt(2*pi)
    let p = d * (-z * z / 2.0).exp()
        * (t * (0.319381530
            + t * (-0.356563782
                + t * (1.781477937
                    + t * (-1.821255978
                        + t * 1.330274429)))));
    p.clamp(0.0, 1.0)
}

/// Print the per-scale spread table, the decay analysis, and the verdict.
pub fn print_sweep_summary(result: &SweepResult) {
    println!("{}", "=".repeat(60));
    println!("Multi-Scale Analysis: spectral spread vs magnitude");
    println!("{}", "=".repeat(60));
    println!();
    println!("{:>8} {:>12} {:>10}", "scale", "spread (%)", "samples");
    println!("{}", "-".repeat(34));
    for s in &result.scales {
        println!("{:>8} {:>12.2} {:>10}", s.label, s.spread_pct, s.n_samples);
    }

    let t = &result.trend;
    println!();
    println!("Decay analysis:");
    println!("  Slope:   {:+.4} per decade", t.slope);
    println!("  t-stat:  {:.3} (df = {:.0})", t.t_statistic, t.degrees_of_freedom);
    println!("  p-value: {:.2e}", t.p_value);
    if t.persistent {
        println!("  Effect is asymptotically persistent (p > {:.2}: no detectable decay)", t.alpha);
    } else {
        println!("  Effect decays with scale (p <= {:.2})", t.alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_perfect_line() {
        // An exact nonzero slope is decisive, not degenerate.
        let pts: Vec<(f64, f64)> = (0..6).map(|i| (i as f64, 3.0 + 2.0 * i as f64)).collect();
        let trend = fit_trend(&pts, 0.05);
        assert!((trend.slope - 2.0).abs() < 1e-9);
        assert!((trend.intercept - 3.0).abs() < 1e-9);
        assert!((trend.r_squared - 1.0).abs() < 1e-9);
        assert!(trend.p_value < 0.01, "p = {}", trend.p_value);
        assert!(!trend.persistent);
    }

    #[test]
    fn test_exact_linear_decay_not_persistent() {
        // Spread falling exactly one point per decade must be reported as
        // decay, with or without residual noise around the line.
        let pts: Vec<(f64, f64)> = (4..=16).map(|e| (e as f64, 14.0 - e as f64)).collect();
        let trend = fit_trend(&pts, 0.05);
        assert!((trend.slope + 1.0).abs() < 1e-9);
        assert!(trend.p_value < 1e-3, "p = {}", trend.p_value);
        assert!(!trend.persistent, "exact decay reported persistent: {:?}", trend);
    }

    #[test]
    fn test_trend_constant_spread_is_persistent() {
        let pts: Vec<(f64, f64)> = [4, 6, 8, 10, 12, 14, 16]
            .iter()
            .map(|&e| (e as f64, 7.26))
            .collect();
        let trend = fit_trend(&pts, 0.05);
        assert!(trend.slope.abs() < 1e-12);
        assert_eq!(trend.p_value, 1.0);
        assert!(trend.persistent);
    }

    #[test]
    fn test_trend_strong_decay_detected() {
        // Clear decay with mild curvature so residuals are nonzero.
        let pts = vec![
            (4.0, 10.0),
            (6.0, 8.1),
            (8.0, 5.9),
            (10.0, 4.05),
            (12.0, 1.95),
            (14.0, 0.1),
            (16.0, -2.0),
        ];
        let trend = fit_trend(&pts, 0.05);
        assert!(trend.slope < -0.9);
        assert!(trend.p_value < 0.01, "p = {}", trend.p_value);
        assert!(!trend.persistent);
    }

    #[test]
    fn test_trend_insufficient_points() {
        let trend = fit_trend(&[(4.0, 7.0), (6.0, 7.1)], 0.05);
        assert_eq!(trend.p_value, 1.0);
        assert!(trend.persistent);
    }

    #[test]
    fn test_normal_sf_reference_points() {
        assert!((normal_sf(0.0) - 0.5).abs() < 0.01);
        assert!((normal_sf(1.96) - 0.025).abs() < 0.005);
        assert!((normal_sf(-1.96) - 0.975).abs() < 0.005);
    }

    #[test]
    fn test_small_df_widens_tails() {
        // The same t is less surprising with 5 df than with 1000 df.
        let p_small = approximate_two_sided_p(2.0, 5.0);
        let p_large = approximate_two_sided_p(2.0, 1000.0);
        assert!(p_small > p_large);
    }

    #[test]
    fn test_zero_noise_sweep_is_persistent() {
        // Noise-free model with the chi7 term zeroed: bias is then an exact
        // function of N mod 30, so every scale measures the same spread and
        // the trend test has nothing to reject.
        let mut model = BiasModel::paper(0.0);
        model.chi7 = 0.0;
        let config = SweepConfig {
            exponents: vec![4, 6, 8, 10],
            samples_per_scale: 20_000,
            model,
            seed: 42,
            alpha: 0.05,
        };
        let result = run_sweep(&config).unwrap();
        assert_eq!(result.scales.len(), 4);
        let first = result.scales[0].spread_pct;
        for s in &result.scales {
            assert!(s.spread_pct > 0.0);
            assert!((s.spread_pct - first).abs() < 1e-9, "spread varies: {:?}", result.scales);
        }
        assert_eq!(result.trend.p_value, 1.0);
        assert!(result.trend.persistent);
    }
}
