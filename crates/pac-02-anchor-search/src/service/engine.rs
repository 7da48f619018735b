//! Anchor engine: bound validation plus per-anchor evaluation.

use pac_01_prime_universe::{MembershipOracle, PrimeUniverse};
use tracing::{debug, info};

use crate::domain::{
    classify, classify_distance, Anchor, AnchorRange, Evaluation, GridAnchor, GridEvaluation,
    NearestPrimeSearcher, Primorial, PrimorialGrid, SearchOutcome,
};
use crate::error::EngineError;
use crate::metrics::ScanSnapshot;
use crate::ports::{AnchorSearchApi, AnchorSink, GridSink, ProgressObserver};
use crate::service::scan::AnchorScan;

/// Searcher and classifier bound to one prime universe.
#[derive(Clone, Copy, Debug)]
pub struct AnchorEngine<'u> {
    universe: &'u PrimeUniverse,
    searcher: NearestPrimeSearcher,
}

impl<'u> AnchorEngine<'u> {
    pub fn new(universe: &'u PrimeUniverse, cap: u64) -> Result<Self, EngineError> {
        if cap == 0 {
            return Err(EngineError::InvalidSearchCap);
        }
        Ok(Self {
            universe,
            searcher: NearestPrimeSearcher::new(cap),
        })
    }

    pub fn universe(&self) -> &'u PrimeUniverse {
        self.universe
    }

    pub fn searcher(&self) -> NearestPrimeSearcher {
        self.searcher
    }

    /// Search and classify one anchor.
    ///
    /// Unchecked: the anchor must come from a validated range.
    pub fn evaluate(&self, anchor: Anchor) -> Evaluation {
        let outcome = self.searcher.search(self.universe, anchor.value());
        let verdict = classify(&outcome, self.universe);
        Evaluation {
            anchor,
            outcome,
            verdict,
        }
    }

    /// Check that every anchor in `range`, widened by `lookback` and
    /// `lookahead`, exists and that every search around them stays below the
    /// largest loaded prime.
    pub fn validate_range(
        &self,
        range: AnchorRange,
        lookback: usize,
        lookahead: usize,
    ) -> Result<(), EngineError> {
        let last = match range.last() {
            Some(last) => last,
            None => {
                return Err(EngineError::EmptyRange {
                    start: range.start,
                    end: range.end,
                })
            }
        };
        if range.start < lookback {
            return Err(EngineError::InsufficientLookback {
                start: range.start,
                lookback,
            });
        }

        let available = self.universe.len();
        let furthest = last.saturating_add(lookahead);
        let anchor = Anchor::at(self.universe.primes(), furthest).ok_or(
            EngineError::IndexOutOfRange {
                required: furthest.saturating_add(2),
                available,
            },
        )?;

        // Anchors grow with the index, so the furthest one bounds every lookup.
        let required = self.searcher.reach(anchor.value());
        if !self.universe.covers(required) {
            return Err(EngineError::InsufficientData {
                required,
                available: self.universe.max_prime(),
            });
        }

        debug!(
            start = range.start,
            end = range.end,
            lookback,
            lookahead,
            reach = required,
            "Anchor range validated"
        );
        Ok(())
    }

    /// Validate and open a step-wise scan feeding `sink`.
    pub fn scan<S: AnchorSink>(
        &self,
        range: AnchorRange,
        sink: S,
    ) -> Result<AnchorScan<'u, S>, EngineError> {
        self.validate_range(range, sink.lookback(), sink.lookahead())?;
        Ok(AnchorScan::new(*self, range, sink))
    }

    /// Scan `range` to completion, reporting every `progress_interval`
    /// anchors, and hand back the sink with the final counters.
    pub fn run<S, P>(
        &self,
        range: AnchorRange,
        sink: S,
        observer: &mut P,
        progress_interval: u64,
    ) -> Result<(S, ScanSnapshot), EngineError>
    where
        S: AnchorSink,
        P: ProgressObserver + ?Sized,
    {
        info!(
            start = range.start,
            end = range.end,
            cap = self.searcher.cap(),
            "Starting anchor scan"
        );
        let mut scan = self.scan(range, sink)?.with_progress_interval(progress_interval);
        let snapshot = scan.run(observer)?;
        Ok((scan.into_sink(), snapshot))
    }

    /// Evaluate the grid anchors of every universe prime above 7 under each
    /// of `filters`.
    ///
    /// Returns the number of primes tested.
    pub fn scan_grid<G: GridSink>(
        &self,
        filters: &[Primorial],
        sink: &mut G,
    ) -> Result<u64, EngineError> {
        let mut tested = 0u64;
        let mut row = Vec::with_capacity(filters.len());
        for prime in PrimorialGrid::new(self.universe.primes()) {
            row.clear();
            for &filter in filters {
                row.push(self.grid_evaluation(prime, filter)?);
            }
            sink.observe_prime(prime, &row)?;
            tested += 1;
        }
        info!(tested, filters = filters.len(), "Primorial grid scanned");
        Ok(tested)
    }

    fn grid_evaluation(&self, prime: u64, filter: Primorial) -> Result<GridEvaluation, EngineError> {
        let grid = GridAnchor::nearest(prime, filter);
        let k = grid.distance();
        if !self.universe.covers(k) {
            return Err(EngineError::InsufficientData {
                required: k,
                available: self.universe.max_prime(),
            });
        }
        Ok(GridEvaluation {
            grid,
            verdict: classify_distance(k, self.universe),
        })
    }
}

impl AnchorSearchApi for AnchorEngine<'_> {
    fn anchor_at(&self, index: usize) -> Result<Anchor, EngineError> {
        Anchor::at(self.universe.primes(), index).ok_or(EngineError::IndexOutOfRange {
            required: index.saturating_add(2),
            available: self.universe.len(),
        })
    }

    fn search_value(&self, value: u64) -> Result<SearchOutcome, EngineError> {
        let required = self.searcher.reach(value);
        if !self.universe.covers(required) {
            return Err(EngineError::InsufficientData {
                required,
                available: self.universe.max_prime(),
            });
        }
        Ok(self.searcher.search(self.universe, value))
    }

    fn evaluate_index(&self, index: usize) -> Result<Evaluation, EngineError> {
        let anchor = self.anchor_at(index)?;
        let outcome = self.search_value(anchor.value())?;
        let verdict = classify(&outcome, self.universe);
        Ok(Evaluation {
            anchor,
            outcome,
            verdict,
        })
    }

    fn evaluate_grid(&self, prime: u64, filter: Primorial) -> Result<GridEvaluation, EngineError> {
        self.grid_evaluation(prime, filter)
    }
}
