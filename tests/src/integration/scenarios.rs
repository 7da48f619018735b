//! # Scenario Tests
//!
//! Small universes whose answers can be checked by hand:
//!
//! 1. **S = 12 and S = 24**: real anchors one step from a prime
//! 2. **S = 90**: a constructed listing that forces k = 9
//! 3. **Law III abort**: a gapped listing where the correction run stops,
//!    keeping the records made before the falsifying anchor, sequential or
//!    partitioned

#[cfg(test)]
mod tests {
    use pac_01_prime_universe::{primes_up_to, PrimeUniverse};
    use pac_02_anchor_search::{
        AnchorEngine, AnchorRange, AnchorSearchApi, EngineError, NoOpProgress,
    };
    use pac_03_aggregation::{FrequencyTally, PipelineKind, PipelineSettings};
    use pac_runtime::export::{export_csv, CSV_HEADER};
    use pac_runtime::{Job, PrimeInput, RunConfig, RunError, Runner};

    use crate::fixtures::{gapped_listing, write_listing};

    // =========================================================================
    // REAL ANCHORS
    // =========================================================================

    #[test]
    fn test_s12_and_s24_are_one_away() {
        let universe = PrimeUniverse::up_to(100).expect("sieve universe");
        let engine = AnchorEngine::new(&universe, 10).expect("cap");

        // 5 + 7
        let twelve = engine.evaluate_index(2).expect("in range");
        assert_eq!(twelve.anchor.value(), 12);
        assert_eq!(twelve.outcome.k_min, 1);
        assert_eq!(twelve.outcome.neighbor_prime, 11, "lower prime tested first");
        assert!(twelve.verdict.is_success);

        // 11 + 13
        let twenty_four = engine.evaluate_index(4).expect("in range");
        assert_eq!(twenty_four.anchor.value(), 24);
        assert_eq!(twenty_four.outcome.k_min, 1);
        assert_eq!(twenty_four.outcome.neighbor_prime, 23);
    }

    // =========================================================================
    // CONSTRUCTED FAILURE
    // =========================================================================

    #[test]
    fn test_constructed_s90_fails_with_k9() {
        // 43 + 47 = 90 with nothing in 82..=98 and 99 listed.
        let mut listing: Vec<u64> = primes_up_to(47);
        listing.extend([99, 113]);
        let universe = PrimeUniverse::from_ascending(listing).expect("ascending");
        let engine = AnchorEngine::new(&universe, 20).expect("cap");

        let evaluation = engine.evaluate_index(13).expect("in range");
        assert_eq!(evaluation.anchor.value(), 90);
        assert_eq!(evaluation.outcome.k_min, 9);
        assert_eq!(evaluation.outcome.neighbor_prime, 99);
        assert!(evaluation.verdict.is_composite_failure);

        let (tally, snapshot) = engine
            .run(AnchorRange::new(13, 14), FrequencyTally::new(), &mut NoOpProgress, 10)
            .expect("scan");
        assert_eq!(snapshot.composite_failures, 1);
        let report = tally.report(20);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].k, 9, "bucket key is the raw distance");
        assert_eq!(report.rows[0].count, 1);
    }

    // =========================================================================
    // LAW III ABORT
    // =========================================================================

    fn abort_config(path: std::path::PathBuf, threads: usize) -> RunConfig {
        let settings = PipelineSettings {
            max_radius: 1,
            ..PipelineSettings::default()
        };
        // Range 10..22 after the radius shift.
        RunConfig::new(Job::Scan(PipelineKind::Correction))
            .with_primes(PrimeInput::File {
                path,
                max_count: None,
            })
            .with_range(9, 12)
            .with_search_caps(50, 50)
            .with_settings(settings)
            .with_threads(threads)
    }

    fn exhausted_at_21() -> EngineError {
        EngineError::CorrectionExhausted {
            index: 21,
            anchor: 162,
            neighbor_prime: 137,
            k_min: 25,
            max_radius: 1,
        }
    }

    #[test]
    fn test_falsification_keeps_partial_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let listing = write_listing(&dir, "gapped.txt", &gapped_listing());

        let runner = Runner::new(abort_config(listing, 1)).expect("valid config");
        let (source, partial) = match runner.run() {
            Err(RunError::Falsified { source, partial }) => (source, partial),
            other => panic!("expected the Law III path, got {other:?}"),
        };
        assert_eq!(source, exhausted_at_21());

        // S_20 = 152 -> q = 137, k = 15, fixed by S_19 = 144 (|144 - 137| = 7).
        assert_eq!(partial.len(), 1);
        let record = partial[0];
        assert_eq!(record.index, 20);
        assert_eq!(record.k_min, 15);
        assert_eq!(record.radius, 1);
        assert_eq!(record.fix_index, 19);
        assert_eq!(record.fix_anchor, 144);

        let csv = dir.path().join("partial.csv");
        export_csv(&csv, &partial).expect("export");
        let text = std::fs::read_to_string(&csv).expect("read back");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![CSV_HEADER, "20,152,137,15,2,2,152,1,144,0,24,144"]);
    }

    #[test]
    fn test_partitioned_falsification_keeps_same_partial_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let listing = write_listing(&dir, "gapped.txt", &gapped_listing());

        let sequential = match Runner::new(abort_config(listing.clone(), 1))
            .expect("valid config")
            .run()
        {
            Err(RunError::Falsified { partial, .. }) => partial,
            other => panic!("expected the Law III path, got {other:?}"),
        };

        // Partitions 10..14, 14..18 and 18..22; the abort lands in the last.
        match Runner::new(abort_config(listing, 3)).expect("valid config").run() {
            Err(RunError::Falsified { source, partial }) => {
                assert_eq!(source, exhausted_at_21());
                assert_eq!(partial, sequential, "same corrections as the sequential run");
                assert_eq!(partial.len(), 1);
                assert_eq!(partial[0].index, 20);
            }
            other => panic!("expected the Law III path, got {other:?}"),
        }
    }

    #[test]
    fn test_wider_radius_corrects_everything() {
        let dir = tempfile::tempdir().expect("temp dir");
        let listing = write_listing(&dir, "gapped.txt", &gapped_listing());

        let mut config = abort_config(listing, 1);
        config.settings.max_radius = 2;
        // Start one earlier so the range is still 10..22.
        config.start_index = 8;
        let outcome = Runner::new(config)
            .expect("valid config")
            .run()
            .expect("every failure corrected within radius 2");
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[1].index, 21);
        assert_eq!(outcome.records[1].radius, 2);
    }
}
