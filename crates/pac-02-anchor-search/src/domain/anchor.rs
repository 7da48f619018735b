//! Anchors S_n = p_n + p_{n+1} and their enumeration.

use serde::{Deserialize, Serialize};

use super::primorial::{Primorial, ResidueSignature};

/// Sum of two consecutive primes, with its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Index n of the lower prime in the universe listing
    pub index: usize,
    /// p_n
    pub lower: u64,
    /// p_{n+1}
    pub upper: u64,
}

impl Anchor {
    pub fn new(index: usize, lower: u64, upper: u64) -> Self {
        Self {
            index,
            lower,
            upper,
        }
    }

    /// Random access: the anchor built from `primes[index]` and `primes[index + 1]`.
    pub fn at(primes: &[u64], index: usize) -> Option<Self> {
        let lower = *primes.get(index)?;
        let upper = *primes.get(index.checked_add(1)?)?;
        Some(Self::new(index, lower, upper))
    }

    /// S_n
    pub fn value(&self) -> u64 {
        self.lower + self.upper
    }

    /// g_n = p_{n+1} - p_n
    pub fn gap(&self) -> u64 {
        self.upper - self.lower
    }

    pub fn residue(&self, modulus: u64) -> u64 {
        self.value() % modulus
    }

    pub fn is_perfect(&self, filter: Primorial) -> bool {
        filter.is_perfect(self.value())
    }

    pub fn signature(&self) -> ResidueSignature {
        ResidueSignature::of(self.value())
    }
}

/// Half-open index range `start..end` of anchors to visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRange {
    pub start: usize,
    pub end: usize,
}

impl AnchorRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `count` anchors beginning at `start`.
    pub fn starting_at(start: usize, count: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(count),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the last anchor in the range, if any.
    pub fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// Split into at most `parts` contiguous, ordered, non-empty ranges.
    pub fn split(&self, parts: usize) -> Vec<AnchorRange> {
        let len = self.len();
        let parts = parts.clamp(1, len.max(1));
        if len == 0 {
            return Vec::new();
        }
        let base = len / parts;
        let extra = len % parts;

        let mut ranges = Vec::with_capacity(parts);
        let mut cursor = self.start;
        for i in 0..parts {
            let size = base + usize::from(i < extra);
            ranges.push(AnchorRange::new(cursor, cursor + size));
            cursor += size;
        }
        ranges
    }

    /// Lazily enumerate the anchors of this range.
    pub fn iter<'u>(&self, primes: &'u [u64]) -> ConsecutiveSums<'u> {
        ConsecutiveSums {
            primes,
            next: self.start,
            end: self.end,
        }
    }
}

/// Strictly increasing, single-pass enumeration of anchors.
///
/// Restart by calling [`AnchorRange::iter`] again; the enumerator never
/// revisits an index.
#[derive(Clone, Debug)]
pub struct ConsecutiveSums<'u> {
    primes: &'u [u64],
    next: usize,
    end: usize,
}

impl ConsecutiveSums<'_> {
    /// Index the next call to `next()` would produce.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl Iterator for ConsecutiveSums<'_> {
    type Item = Anchor;

    fn next(&mut self) -> Option<Anchor> {
        if self.next >= self.end {
            return None;
        }
        let anchor = Anchor::at(self.primes, self.next)?;
        self.next += 1;
        Some(anchor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let available = self.primes.len().saturating_sub(1);
        let remaining = self.end.min(available).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
