//! Mod-30 spectral analysis of the bias.
//!
//! 30 = 2·3·5, so N mod 30 jointly encodes the parity and the χ3/χ5 channels;
//! bucketing bias by residue class makes the character structure visible as a
//! surplus/deficit pattern. The aggregator is generic over all 30 residues —
//! with even N only the 15 even classes occur, but nothing here assumes that.
//!
//! Standard deviation uses the sample convention (n - 1 denominator); a
//! single-member bucket reports 0.0.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Sample;

/// Per-residue bias statistics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResidueStats {
    /// The residue class N ≡ r (mod 30).
    pub residue: u64,
    /// Mean bias over the bucket.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator) of the bias over the bucket.
    pub std_dev: f64,
    /// Bucket size.
    pub count: usize,
}

/// Result of the mod-30 aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct Mod30Summary {
    /// Occupied residue classes in ascending residue order.
    pub groups: Vec<ResidueStats>,
    /// Up to 5 classes with the highest mean bias, descending
    /// (ties broken by residue ascending).
    pub surplus: Vec<ResidueStats>,
    /// Up to 5 classes with the lowest mean bias, ascending
    /// (ties broken by residue ascending).
    pub deficit: Vec<ResidueStats>,
    /// (max bucket mean - min bucket mean) × 100, over ALL occupied classes.
    pub spread_pct: f64,
}

/// Bucket samples by N mod 30 and summarize the bias per bucket.
pub fn mod30_analysis(samples: &[Sample]) -> Mod30Summary {
    let mut buckets: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for s in samples {
        buckets.entry(s.n % 30).or_default().push(s.bias);
    }

    let groups: Vec<ResidueStats> = buckets
        .iter()
        .map(|(&residue, biases)| {
            let count = biases.len();
            let mean = biases.iter().sum::<f64>() / count as f64;
            let std_dev = if count > 1 {
                let ss: f64 = biases.iter().map(|b| (b - mean).powi(2)).sum();
                (ss / (count - 1) as f64).sqrt()
            } else {
                0.0
            };
            ResidueStats { residue, mean, std_dev, count }
        })
        .collect();

    let mut by_mean_desc = groups.clone();
    by_mean_desc.sort_by(|a, b| {
        b.mean
            .partial_cmp(&a.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.residue.cmp(&b.residue))
    });
    let surplus: Vec<ResidueStats> = by_mean_desc.iter().take(5).copied().collect();

    let mut by_mean_asc = groups.clone();
    by_mean_asc.sort_by(|a, b| {
        a.mean
            .partial_cmp(&b.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.residue.cmp(&b.residue))
    });
    let deficit: Vec<ResidueStats> = by_mean_asc.iter().take(5).copied().collect();

    let spread_pct = match (
        by_mean_desc.first().map(|g| g.mean),
        by_mean_asc.first().map(|g| g.mean),
    ) {
        (Some(max), Some(min)) => (max - min) * 100.0,
        _ => 0.0,
    };

    Mod30Summary { groups, surplus, deficit, spread_pct }
}

/// Print the surplus/deficit tables and the spectral spread.
pub fn print_mod30_report(summary: &Mod30Summary) {
    println!("{}", "=".repeat(60));
    println!("Mod 30 Spectral Analysis");
    println!("{}", "=".repeat(60));
    println!();
    println!("Top {} Surplus (least negative bias):", summary.surplus.len());
    for g in &summary.surplus {
        println!("  N = {:2} (mod 30): {:+.2}%  (n={})", g.residue, g.mean * 100.0, g.count);
    }
    println!();
    println!("Top {} Deficit (most negative bias):", summary.deficit.len());
    for g in &summary.deficit {
        println!("  N = {:2} (mod 30): {:+.2}%  (n={})", g.residue, g.mean * 100.0, g.count);
    }
    println!();
    println!("Spectral Spread: {:.2}%", summary.spread_pct);
}
