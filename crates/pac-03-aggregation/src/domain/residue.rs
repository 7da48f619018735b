//! Composite distances binned by the anchor's residue class.

use std::collections::BTreeSet;

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{AnchorSink, EngineError, Evaluation, Mergeable, Primorial};
use serde::{Deserialize, Serialize};

use super::bucket::{percent, TallyBucket};

/// Distances listed per residue class in the report.
pub const TOP_PER_RESIDUE: usize = 5;

/// `(S mod M, k_min)` frequency table over composite failures.
#[derive(Clone, Debug)]
pub struct ResidueTally {
    filter: Primorial,
    table: TallyBucket<(u64, u64)>,
    failures: u64,
}

impl Default for ResidueTally {
    fn default() -> Self {
        Self::new(Primorial::P3)
    }
}

impl ResidueTally {
    pub fn new(filter: Primorial) -> Self {
        Self {
            filter,
            table: TallyBucket::new(),
            failures: 0,
        }
    }

    pub fn filter(&self) -> Primorial {
        self.filter
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Failures with `S mod M == residue` and distance `k`.
    pub fn count(&self, residue: u64, k: u64) -> u64 {
        self.table.count(&(residue, k))
    }

    fn class(&self, residue: u64) -> TallyBucket<u64> {
        let mut class = TallyBucket::new();
        for ((r, k), tally) in self.table.iter() {
            if r == residue {
                class.add(k, tally);
            }
        }
        class
    }

    pub fn report(&self) -> ResidueReport {
        let modulus = self.filter.modulus();
        let reachable = reachable_residues(modulus);
        let classes = (0..modulus)
            .map(|residue| {
                let class = self.class(residue);
                let failures = class.total().count;
                let forbidden_distances = (residue == 0).then(|| {
                    class
                        .keys()
                        .filter(|&k| self.filter.forbids(k))
                        .collect::<Vec<u64>>()
                });
                let (top, _) = class.top_with_remainder(TOP_PER_RESIDUE);
                ResidueClassReport {
                    residue,
                    reachable: reachable.contains(&residue),
                    failures,
                    distinct_distances: class.len(),
                    forbidden_distances,
                    top: top
                        .into_iter()
                        .map(|(k, tally)| KShare {
                            k,
                            count: tally.count,
                            percent: percent(tally.count, failures),
                        })
                        .collect(),
                }
            })
            .collect();
        ResidueReport {
            filter: self.filter,
            modulus,
            total_failures: self.failures,
            reachable_residues: reachable.into_iter().collect(),
            classes,
        }
    }
}

/// Residues of `r1 + r2 (mod m)` over residues coprime to `m`: the classes
/// a sum of two primes above the factors of `m` can land in.
pub fn reachable_residues(modulus: u64) -> BTreeSet<u64> {
    let units: Vec<u64> = (1..modulus).filter(|&r| gcd(r, modulus) == 1).collect();
    let mut reachable = BTreeSet::new();
    for &a in &units {
        for &b in &units {
            reachable.insert((a + b) % modulus);
        }
    }
    reachable
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl AnchorSink for ResidueTally {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        _universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        if evaluation.verdict.is_composite_failure {
            self.failures += 1;
            let residue = evaluation.anchor.residue(self.filter.modulus());
            self.table.increment((residue, evaluation.outcome.k_min));
        }
        Ok(())
    }
}

impl Mergeable for ResidueTally {
    fn merge(&mut self, other: Self) {
        self.failures += other.failures;
        self.table.merge(other.table);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidueReport {
    pub filter: Primorial,
    pub modulus: u64,
    pub total_failures: u64,
    pub reachable_residues: Vec<u64>,
    /// One entry per residue `0..modulus`
    pub classes: Vec<ResidueClassReport>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidueClassReport {
    pub residue: u64,
    pub reachable: bool,
    pub failures: u64,
    pub distinct_distances: usize,
    /// Residue 0 only: distances sharing an odd prime factor with the modulus
    pub forbidden_distances: Option<Vec<u64>>,
    pub top: Vec<KShare>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KShare {
    pub k: u64,
    pub count: u64,
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pac_02_anchor_search::{Anchor, LawIVerdict, SearchOutcome};

    fn failure(lower: u64, upper: u64, k: u64) -> Evaluation {
        Evaluation {
            anchor: Anchor::new(10, lower, upper),
            outcome: SearchOutcome::hit(k, lower + upper + k),
            verdict: LawIVerdict::FAILURE,
        }
    }

    #[test]
    fn test_reachable_residues_mod_30() {
        let reachable: Vec<u64> = reachable_residues(30).into_iter().collect();
        assert_eq!(
            reachable,
            vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28]
        );
        assert_eq!(reachable_residues(6).into_iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_table_keys_by_residue_and_k() {
        let universe = PrimeUniverse::up_to(100).expect("sieve universe");
        let mut tally = ResidueTally::default();
        // 41 + 43 = 84 ≡ 24, k = 9 twice; 13 + 17 = 30 ≡ 0, k = 49.
        tally.observe(&failure(41, 43, 9), &universe).expect("observe");
        tally.observe(&failure(41, 43, 9), &universe).expect("observe");
        tally.observe(&failure(13, 17, 49), &universe).expect("observe");

        assert_eq!(tally.failures(), 3);
        assert_eq!(tally.count(24, 9), 2);
        assert_eq!(tally.count(0, 49), 1);
        assert_eq!(tally.count(0, 9), 0);

        let report = tally.report();
        assert_eq!(report.classes.len(), 30);
        let class_24 = &report.classes[24];
        assert_eq!(class_24.failures, 2);
        assert_eq!(class_24.top[0].k, 9);
        assert_eq!(class_24.top[0].percent, 100.0);
        assert!(class_24.forbidden_distances.is_none());

        let class_0 = &report.classes[0];
        assert_eq!(class_0.forbidden_distances, Some(Vec::new()), "49 is allowed mod 30");
        assert!(!report.classes[1].reachable);
    }

    #[test]
    fn test_residue_zero_forbidden_check() {
        let universe = PrimeUniverse::up_to(100).expect("sieve universe");
        let mut tally = ResidueTally::default();
        tally.observe(&failure(13, 17, 25), &universe).expect("observe");
        tally.observe(&failure(13, 17, 49), &universe).expect("observe");

        let report = tally.report();
        assert_eq!(report.classes[0].forbidden_distances, Some(vec![25]));
    }

    #[test]
    fn test_top_five_per_class() {
        let universe = PrimeUniverse::up_to(100).expect("sieve universe");
        let mut tally = ResidueTally::default();
        for k in [9u64, 15, 21, 25, 27, 33, 35] {
            tally.observe(&failure(41, 43, k), &universe).expect("observe");
        }
        tally.observe(&failure(41, 43, 35), &universe).expect("observe");

        let class = &tally.report().classes[24];
        assert_eq!(class.distinct_distances, 7);
        assert_eq!(class.top.len(), TOP_PER_RESIDUE);
        assert_eq!(class.top[0].k, 35);
    }

    #[test]
    fn test_merge() {
        let universe = PrimeUniverse::up_to(100).expect("sieve universe");
        let mut left = ResidueTally::default();
        let mut right = ResidueTally::default();
        left.observe(&failure(41, 43, 9), &universe).expect("observe");
        right.observe(&failure(41, 43, 9), &universe).expect("observe");

        left.merge(right);
        assert_eq!(left.count(24, 9), 2);
        assert_eq!(left.failures(), 2);
    }
}
