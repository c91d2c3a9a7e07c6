//! Spectral audit of the second main term in the Hardy-Littlewood formula.
//!
//! For even N, the classical singular-series prediction for the number of
//! Goldbach representations carries an empirical bias. The working hypothesis
//! is that the bias has a second main term built from the real Dirichlet
//! characters mod 3, 5 and 7:
//!
//!   Bias(N) ≈ c0 + a3·χ3(N) + a5·χ5(N) + a7·χ7(N) + (pairwise products)
//!
//! Two audits probe this structure:
//!   1. `validate` — regress simulated bias on the six character features for
//!      N coprime to 105, and bucket bias by N mod 30 (spectral analysis).
//!   2. `sweep`    — repeat the mod-30 analysis across magnitude decades
//!      10^4 .. 10^16 and test whether the spectral spread decays.
//!
//! Interpretation:
//!   R² ≈ 1, coefficients stable  → bias is captured by the character model
//!   spread slope p > α           → no detectable decay ("persistent");
//!                                  failure to detect decay, not a proof

pub mod characters;
pub mod features;
pub mod mod30;
pub mod regression;
pub mod simulate;
pub mod sweep;
pub mod validate;

use serde::Serialize;

/// One observation: an even integer N and its bias, the deviation of the
/// observed Goldbach-representation count from the Hardy-Littlewood main term.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Sample {
    pub n: u64,
    pub bias: f64,
}

/// Errors that abort an analysis run. All are terminal: a run either prints
/// its full report or fails with the stage that violated its precondition.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("character table has no entry for p = {0}; supported primes are 3, 5, 7")]
    UnsupportedPrime(u64),

    #[error("no samples coprime to 105 in input set of size {0}")]
    InsufficientData(usize),

    #[error("design matrix is rank-deficient ({0})")]
    SingularDesign(String),
}
