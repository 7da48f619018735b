//! Primorial filters P_2..P_5 and residue signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Products of the first k primes, used to classify anchors as "perfect"
/// (residue 0) or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primorial {
    /// 2 * 3 = 6
    P2,
    /// 2 * 3 * 5 = 30
    P3,
    /// 2 * 3 * 5 * 7 = 210
    P4,
    /// 2 * 3 * 5 * 7 * 11 = 2310
    P5,
}

impl Primorial {
    /// Every filter, weakest first.
    pub const ALL: [Primorial; 4] = [Primorial::P2, Primorial::P3, Primorial::P4, Primorial::P5];

    /// Filters compared by the composite-failure-rate run.
    pub const GRID: [Primorial; 3] = [Primorial::P2, Primorial::P3, Primorial::P4];

    pub const fn modulus(self) -> u64 {
        match self {
            Primorial::P2 => 6,
            Primorial::P3 => 30,
            Primorial::P4 => 210,
            Primorial::P5 => 2310,
        }
    }

    pub const fn prime_factors(self) -> &'static [u64] {
        match self {
            Primorial::P2 => &[2, 3],
            Primorial::P3 => &[2, 3, 5],
            Primorial::P4 => &[2, 3, 5, 7],
            Primorial::P5 => &[2, 3, 5, 7, 11],
        }
    }

    /// Factors a composite distance may not share with a perfect anchor.
    ///
    /// 2 is excluded: every anchor past the first index is a sum of two odd
    /// primes, so parity carries no information.
    pub fn forbidden_factors(self) -> &'static [u64] {
        &self.prime_factors()[1..]
    }

    /// Does `k` share a forbidden factor with this filter?
    pub fn forbids(self, k: u64) -> bool {
        self.forbidden_factors().iter().any(|&p| k % p == 0)
    }

    /// Is `value` a multiple of the filter?
    pub fn is_perfect(self, value: u64) -> bool {
        value % self.modulus() == 0
    }

    pub fn from_modulus(modulus: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.modulus() == modulus)
    }

    /// Subscript label used in reports, e.g. `P_3`.
    pub fn label(self) -> &'static str {
        match self {
            Primorial::P2 => "P_2",
            Primorial::P3 => "P_3",
            Primorial::P4 => "P_4",
            Primorial::P5 => "P_5",
        }
    }
}

impl fmt::Display for Primorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.label(), self.modulus())
    }
}

/// Residues of a value modulo 6, 30 and 210.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueSignature {
    pub mod6: u64,
    pub mod30: u64,
    pub mod210: u64,
}

impl ResidueSignature {
    pub fn of(value: u64) -> Self {
        Self {
            mod6: value % 6,
            mod30: value % 30,
            mod210: value % 210,
        }
    }
}
