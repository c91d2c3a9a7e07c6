//! Real Dirichlet characters: the Legendre symbol χ_p(N) for p ∈ {3, 5, 7}.
//!
//! Each supported prime carries its explicit quadratic-residue partition of
//! (Z/pZ)*. This is a lookup table, not a general Legendre-symbol algorithm:
//! extending to a new prime means adding its residue/non-residue sets here.

use crate::AnalysisError;

/// Quadratic-residue partition of (Z/pZ)* for one prime.
#[derive(Debug, Clone, Copy)]
pub struct CharacterTable {
    pub p: u64,
    /// Residues r with χ_p(r) = +1.
    pub residues: &'static [u64],
    /// Residues r with χ_p(r) = -1.
    pub non_residues: &'static [u64],
}

/// The three character channels of the second-main-term model.
pub const CHARACTER_TABLES: &[CharacterTable] = &[
    CharacterTable { p: 3, residues: &[1], non_residues: &[2] },
    CharacterTable { p: 5, residues: &[1, 4], non_residues: &[2, 3] },
    CharacterTable { p: 7, residues: &[1, 2, 4], non_residues: &[3, 5, 6] },
];

fn table_for(p: u64) -> Result<&'static CharacterTable, AnalysisError> {
    CHARACTER_TABLES
        .iter()
        .find(|t| t.p == p)
        .ok_or(AnalysisError::UnsupportedPrime(p))
}

/// χ_p(n) ∈ {-1, 0, +1}; zero iff p | n.
pub fn chi(n: u64, p: u64) -> Result<i8, AnalysisError> {
    let table = table_for(p)?;
    let r = n % p;
    if table.residues.contains(&r) {
        Ok(1)
    } else if table.non_residues.contains(&r) {
        Ok(-1)
    } else {
        Ok(0)
    }
}

/// Evaluate χ_p elementwise over a slice, preserving order.
pub fn chi_slice(ns: &[u64], p: u64) -> Result<Vec<i8>, AnalysisError> {
    let table = table_for(p)?;
    Ok(ns
        .iter()
        .map(|&n| {
            let r = n % table.p;
            if table.residues.contains(&r) {
                1
            } else if table.non_residues.contains(&r) {
                -1
            } else {
                0
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi3_known_values() {
        // 3%3=0, 5%3=2, 7%3=1, 9%3=0, 11%3=2, 13%3=1
        let ns = [3u64, 5, 7, 9, 11, 13];
        let chi3 = chi_slice(&ns, 3).unwrap();
        assert_eq!(chi3, vec![0, -1, 1, 0, -1, 1]);
    }

    #[test]
    fn test_chi5_partition() {
        assert_eq!(chi(1, 5).unwrap(), 1);
        assert_eq!(chi(4, 5).unwrap(), 1);
        assert_eq!(chi(2, 5).unwrap(), -1);
        assert_eq!(chi(3, 5).unwrap(), -1);
        assert_eq!(chi(10, 5).unwrap(), 0);
    }

    #[test]
    fn test_chi7_matches_squares() {
        // The +1 set must be exactly the nonzero squares mod 7.
        let squares: Vec<u64> = (1..7u64).map(|x| x * x % 7).collect();
        for r in 1..7u64 {
            let expected = if squares.contains(&r) { 1 } else { -1 };
            assert_eq!(chi(r, 7).unwrap(), expected, "chi_7({}) wrong", r);
        }
    }

    #[test]
    fn test_chi_sign_squares_to_one() {
        for p in [3u64, 5, 7] {
            for n in 1..500u64 {
                let c = chi(n, p).unwrap();
                if n % p != 0 {
                    assert_eq!(c * c, 1, "chi_{}({}) should be a sign", p, n);
                } else {
                    assert_eq!(c, 0, "chi_{}({}) should vanish", p, n);
                }
            }
        }
    }

    #[test]
    fn test_unsupported_prime() {
        let err = chi(10, 11).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedPrime(11)));
        assert!(chi_slice(&[1, 2, 3], 13).is_err());
    }
}
