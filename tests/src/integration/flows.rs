//! # Integration Test Flows
//!
//! Every pipeline end to end over real primes: the sieve universe up to
//! 300 000 and anchors n = 10..10 010 (n = 40..10 040 for the correction
//! run, which is shifted by its radius).
//!
//! ## Flows Tested
//!
//! 1. **Universe → Engine → Frequency**: counts agree with the scan counters
//! 2. **Sequential vs partitioned**: identical reports
//! 3. **Violations, residues, gap correlation**: reference figures
//! 4. **Primorial grid → CFR**
//! 5. **Runner → Correction → CSV**

#[cfg(test)]
mod tests {
    use pac_02_anchor_search::{
        AnchorEngine, AnchorRange, NoOpProgress, Primorial, EXTENDED_SEARCH_CAP,
        STANDARD_SEARCH_CAP,
    };
    use pac_03_aggregation::{
        CfrTally, FrequencyTally, GapByDistance, GapByResidue, Pipeline, PipelineKind,
        PipelineReport, PipelineSettings, ResidueTally, Tally, ViolationDetector,
    };
    use pac_runtime::export::export_csv;
    use pac_runtime::report::{render_json, render_text};
    use pac_runtime::{Job, PrimeInput, RunConfig, Runner};

    use crate::fixtures::{
        reference_universe, REFERENCE_LIMIT, REFERENCE_PAIRS, REFERENCE_START,
    };

    fn reference_range() -> AnchorRange {
        AnchorRange::starting_at(REFERENCE_START, REFERENCE_PAIRS)
    }

    // =========================================================================
    // FREQUENCY
    // =========================================================================

    #[test]
    fn test_frequency_totals_match_scan_counters() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");
        let (tally, snapshot) = engine
            .run(reference_range(), FrequencyTally::new(), &mut NoOpProgress, 1000)
            .expect("scan");

        assert_eq!(snapshot.anchors_processed, 10_000);
        assert_eq!(snapshot.anchors_skipped, 0);
        assert_eq!(snapshot.successes, 9_497);
        assert_eq!(snapshot.composite_failures, 503);
        assert_eq!(tally.failures(), snapshot.composite_failures);

        let report = tally.report(20);
        assert_eq!(report.total_failures, 503);
        assert_eq!(report.distinct_distances, 7);
        assert_eq!((report.rows[0].k, report.rows[0].count), (9, 375));
        assert_eq!((report.rows[1].k, report.rows[1].count), (15, 81));
        assert!(report.other.is_none(), "seven distances fit in the top 20");
    }

    // =========================================================================
    // PARTITIONING
    // =========================================================================

    #[test]
    fn test_partitioned_pipelines_match_sequential() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");
        let settings = PipelineSettings::default();

        for kind in [
            PipelineKind::Frequency,
            PipelineKind::Residues,
            PipelineKind::GapByResidue,
        ] {
            let (sequential, seq_snapshot) = engine
                .run(
                    reference_range(),
                    Pipeline::new(kind, &settings),
                    &mut NoOpProgress,
                    1000,
                )
                .expect("sequential scan");
            let (partitioned, par_snapshot) = engine
                .scan_partitioned(reference_range(), 7, || Pipeline::new(kind, &settings))
                .expect("partitioned scan");

            assert_eq!(seq_snapshot, par_snapshot, "{kind}: counters");
            assert_eq!(
                sequential.report(&settings),
                partitioned.report(&settings),
                "{kind}: reports"
            );
        }
    }

    // =========================================================================
    // VIOLATIONS / RESIDUES / GAPS
    // =========================================================================

    #[test]
    fn test_no_forbidden_factor_violations() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, EXTENDED_SEARCH_CAP).expect("cap");
        let (detector, _) = engine
            .run(reference_range(), ViolationDetector::default(), &mut NoOpProgress, 1000)
            .expect("scan");

        let report = detector.report();
        assert!(!report.falsified);
        let perfect: Vec<(u64, u64)> = report
            .filters
            .iter()
            .map(|f| (f.perfect_anchors, f.perfect_failures))
            .collect();
        assert_eq!(perfect, vec![(5_977, 12), (1_555, 0), (273, 0), (27, 0)]);
        assert!(report.filters.iter().all(|f| f.violation_count == 0));
    }

    #[test]
    fn test_residue_table_mod_30() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");
        let (tally, _) = engine
            .run(reference_range(), ResidueTally::default(), &mut NoOpProgress, 1000)
            .expect("scan");

        let report = tally.report();
        assert_eq!(report.total_failures, 503);
        assert_eq!(report.classes[2].failures, 78);
        assert_eq!(report.classes[10].failures, 75);
        assert_eq!(report.classes[0].failures, 0, "no failures at perfect anchors");
        assert_eq!(report.classes[0].forbidden_distances, Some(Vec::new()));
        assert!(report
            .classes
            .iter()
            .filter(|c| !c.reachable)
            .all(|c| c.failures == 0));
    }

    #[test]
    fn test_gap_correlation() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");

        let (by_k, _) = engine
            .run(reference_range(), GapByDistance::new(), &mut NoOpProgress, 1000)
            .expect("scan");
        assert_eq!(by_k.overall(), Tally { count: 10_000, sum: 104_818 });
        assert_eq!(by_k.get(9), Some(&Tally { count: 375, sum: 4_170 }));
        assert_eq!(by_k.get(35), Some(&Tally { count: 2, sum: 4 }));

        let (by_residue, _) = engine
            .run(reference_range(), GapByResidue::default(), &mut NoOpProgress, 1000)
            .expect("scan");
        assert_eq!(
            by_residue.get(Primorial::P2, 0),
            Some(&Tally { count: 5_977, sum: 57_544 })
        );
        let report = by_residue.report();
        assert!((report.overall_mean_gap - 10.4818).abs() < 1e-9);
        let mod6 = &report.tables[0];
        assert_eq!(mod6.rows.len(), 3, "S mod 6 is 0, 2 or 4");
        assert!(mod6.rows[0].deviation_percent < 0.0, "perfect anchors sit on short gaps");
    }

    // =========================================================================
    // PRIMORIAL GRID
    // =========================================================================

    #[test]
    fn test_grid_anchors_never_fail_below_2310() {
        let universe = reference_universe();
        let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");
        let mut tally = CfrTally::default();
        let tested = engine
            .scan_grid(&Primorial::GRID, &mut tally)
            .expect("grid scan");

        assert_eq!(tested, 25_993);
        let report = tally.report();
        assert_eq!(report.primes_tested, 25_993);
        assert!(report.rows.iter().all(|row| row.failures == 0));
        assert!(!report.decay_holds, "equal rates are not a strict decay");
    }

    // =========================================================================
    // RUNNER → CORRECTION → CSV
    // =========================================================================

    #[test]
    fn test_correction_run_and_export() {
        let config = RunConfig::new(Job::Scan(PipelineKind::Correction))
            .with_primes(PrimeInput::Sieve {
                limit: REFERENCE_LIMIT,
            })
            .with_range(REFERENCE_START, REFERENCE_PAIRS);
        let outcome = Runner::new(config)
            .expect("valid config")
            .run()
            .expect("Law III holds here");

        assert_eq!(outcome.search_cap, EXTENDED_SEARCH_CAP);
        assert_eq!(outcome.records.len(), 503);
        let first = outcome.records[0];
        assert_eq!(
            (first.index, first.anchor, first.neighbor_prime, first.k_min),
            (55, 532, 523, 9)
        );
        assert_eq!((first.radius, first.fix_index, first.fix_anchor), (1, 54, 520));

        let PipelineReport::Correction(summary) = &outcome.report else {
            panic!("correction run reports a correction summary");
        };
        assert_eq!(summary.max_radius_observed, 4);
        let histogram: Vec<(usize, u64)> = summary
            .radius_rows
            .iter()
            .map(|row| (row.radius, row.count))
            .collect();
        assert_eq!(histogram, vec![(1, 422), (2, 69), (3, 9), (4, 3)]);

        let dir = tempfile::tempdir().expect("temp dir");
        let csv = dir.path().join("law3.csv");
        export_csv(&csv, &outcome.records).expect("export");
        let text = std::fs::read_to_string(&csv).expect("read back");
        assert_eq!(text.lines().count(), 504);

        assert!(render_text(&outcome).contains("503 failures corrected within radius 30"));
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&outcome).expect("json")).expect("valid JSON");
        assert_eq!(json["result"]["pipeline"], "correction");
        assert_eq!(json["scan"]["composite_failures"], 503);
    }
}
