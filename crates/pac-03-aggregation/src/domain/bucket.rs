//! Keyed counters shared by every pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Occurrence count plus a running sum (gap totals, radii).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: u64,
    pub sum: u64,
}

impl Tally {
    pub fn record(&mut self, value: u64) {
        self.count += 1;
        self.sum += value;
    }

    pub fn absorb(&mut self, other: Tally) {
        self.count += other.count;
        self.sum += other.sum;
    }

    /// Mean of the recorded values, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Ordered map from key to [`Tally`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyBucket<K: Ord> {
    entries: BTreeMap<K, Tally>,
}

impl<K: Ord> Default for TallyBucket<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TallyBucket<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key` carrying `value`.
    pub fn record(&mut self, key: K, value: u64) {
        self.entries.entry(key).or_default().record(value);
    }

    /// Fold a whole tally into `key`.
    pub fn add(&mut self, key: K, tally: Tally) {
        self.entries.entry(key).or_default().absorb(tally);
    }

    /// Count one occurrence of `key`.
    pub fn increment(&mut self, key: K) {
        self.record(key, 0);
    }

    pub fn get(&self, key: &K) -> Option<&Tally> {
        self.entries.get(key)
    }

    pub fn count(&self, key: &K) -> u64 {
        self.entries.get(key).map_or(0, |t| t.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every key's count.
    pub fn total(&self) -> Tally {
        let mut total = Tally::default();
        for tally in self.entries.values() {
            total.absorb(*tally);
        }
        total
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Tally)> + '_ {
        self.entries.iter().map(|(k, t)| (*k, *t))
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    /// Entries by descending count; equal counts keep ascending key order.
    pub fn ranked(&self) -> Vec<(K, Tally)> {
        let mut ranked: Vec<(K, Tally)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        ranked
    }

    /// The `n` most frequent entries, plus the combined tally of the rest.
    pub fn top_with_remainder(&self, n: usize) -> (Vec<(K, Tally)>, Option<Tally>) {
        let mut ranked = self.ranked();
        if ranked.len() <= n {
            return (ranked, None);
        }
        let mut rest = Tally::default();
        for (_, tally) in ranked.drain(n..) {
            rest.absorb(tally);
        }
        (ranked, Some(rest))
    }

    /// Key-wise sum with another bucket.
    pub fn merge(&mut self, other: TallyBucket<K>) {
        for (key, tally) in other.entries {
            self.add(key, tally);
        }
    }
}

/// Share of `part` in `whole`, in percent; 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_and_mean() {
        let mut bucket = TallyBucket::new();
        bucket.record(9u64, 4);
        bucket.record(9, 8);
        bucket.increment(15);

        let nine = bucket.get(&9).expect("key 9 recorded");
        assert_eq!(nine.count, 2);
        assert_eq!(nine.mean(), 6.0);
        assert_eq!(bucket.count(&15), 1);
        assert_eq!(bucket.count(&25), 0);
        assert_eq!(bucket.total(), Tally { count: 3, sum: 12 });
    }

    #[test]
    fn test_ranked_ties_keep_key_order() {
        let mut bucket = TallyBucket::new();
        for key in [25u64, 9, 9, 15, 49, 49] {
            bucket.increment(key);
        }
        let keys: Vec<u64> = bucket.ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![9, 49, 15, 25]);
    }

    #[test]
    fn test_top_with_remainder() {
        let mut bucket = TallyBucket::new();
        for (key, n) in [(9u64, 5), (15, 3), (25, 2), (21, 1)] {
            for _ in 0..n {
                bucket.increment(key);
            }
        }
        let (top, rest) = bucket.top_with_remainder(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 9);
        assert_eq!(top[1].0, 15);
        assert_eq!(rest.map(|t| t.count), Some(3));

        let (all, rest) = bucket.top_with_remainder(20);
        assert_eq!(all.len(), 4);
        assert!(rest.is_none());
    }

    #[test]
    fn test_merge_is_keywise() {
        let mut left = TallyBucket::new();
        left.record(9u64, 2);
        left.record(15, 4);
        let mut right = TallyBucket::new();
        right.record(9u64, 6);
        right.record(25, 1);

        left.merge(right);
        assert_eq!(left.get(&9), Some(&Tally { count: 2, sum: 8 }));
        assert_eq!(left.count(&15), 1);
        assert_eq!(left.count(&25), 1);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_split_merge_matches_single_pass(
            entries in prop::collection::vec((1u64..60, 0u64..500), 0..200),
            cut in 0usize..200,
        ) {
            let cut = cut.min(entries.len());
            let mut whole = TallyBucket::new();
            for &(key, value) in &entries {
                whole.record(key, value);
            }
            let mut left = TallyBucket::new();
            let mut right = TallyBucket::new();
            for (i, &(key, value)) in entries.iter().enumerate() {
                if i < cut {
                    left.record(key, value);
                } else {
                    right.record(key, value);
                }
            }
            left.merge(right);
            prop_assert_eq!(left, whole);
        }
    }
}
