//! Report emitter: plain-text tables or JSON.

use std::fmt;

use pac_02_anchor_search::ScanSnapshot;
use pac_03_aggregation::{
    CfrReport, CorrectionSummary, FrequencyReport, GapReport, GapResidueReport, PipelineReport,
    ResidueReport, ViolationReport,
};
use serde::Serialize;

use crate::runner::RunOutcome;

const RULE: &str = "------------------------------------------------------------";

/// JSON document written by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub job: &'static str,
    pub primes_loaded: usize,
    pub max_prime: u64,
    pub search_cap: u64,
    pub elapsed_secs: f64,
    pub scan: Option<&'a ScanSnapshot>,
    pub result: &'a PipelineReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(outcome: &'a RunOutcome) -> Self {
        Self {
            job: outcome.job.name(),
            primes_loaded: outcome.primes_loaded,
            max_prime: outcome.max_prime,
            search_cap: outcome.search_cap,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            scan: outcome.snapshot.as_ref(),
            result: &outcome.report,
        }
    }
}

pub fn render_json(outcome: &RunOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(outcome))
}

pub fn render_text(outcome: &RunOutcome) -> String {
    TextReport(outcome).to_string()
}

/// Human-readable rendering of a finished run.
pub struct TextReport<'a>(pub &'a RunOutcome);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(f, "{RULE}")?;
        writeln!(f, "PAC run: {}", outcome.job)?;
        writeln!(
            f,
            "Primes loaded: {} (max {}), search cap {}, {:.1}s",
            outcome.primes_loaded,
            outcome.max_prime,
            outcome.search_cap,
            outcome.elapsed.as_secs_f64()
        )?;
        if let Some(snapshot) = &outcome.snapshot {
            write_snapshot(f, snapshot)?;
        }
        writeln!(f, "{RULE}")?;
        match &outcome.report {
            PipelineReport::Frequency(r) => write_frequency(f, r),
            PipelineReport::Cfr(r) => write_cfr(f, r),
            PipelineReport::Violations(r) => write_violations(f, r),
            PipelineReport::Residues(r) => write_residues(f, r),
            PipelineReport::GapByDistance(r) => write_gap_by_distance(f, r),
            PipelineReport::GapByResidue(r) => write_gap_by_residue(f, r),
            PipelineReport::Correction(r) => write_correction(f, r),
        }
    }
}

fn write_snapshot(f: &mut fmt::Formatter<'_>, s: &ScanSnapshot) -> fmt::Result {
    writeln!(
        f,
        "Anchors: {} processed, {} successes, {} composite failures ({:.4}%), {} skipped",
        s.anchors_processed,
        s.successes,
        s.composite_failures,
        s.failure_rate_percent(),
        s.anchors_skipped
    )?;
    writeln!(f, "Mean nearest-prime distance: {:.3}", s.mean_distance())
}

fn write_frequency(f: &mut fmt::Formatter<'_>, r: &FrequencyReport) -> fmt::Result {
    writeln!(
        f,
        "Composite distances: {} failures, {} distinct k",
        r.total_failures, r.distinct_distances
    )?;
    writeln!(f, "{:>6} {:>12} {:>9}", "k", "count", "percent")?;
    for row in &r.rows {
        writeln!(f, "{:>6} {:>12} {:>8.3}%", row.k, row.count, row.percent)?;
    }
    if let Some(other) = &r.other {
        writeln!(f, "{:>6} {:>12} {:>8.3}%", "other", other.count, other.percent)?;
    }
    Ok(())
}

fn write_cfr(f: &mut fmt::Formatter<'_>, r: &CfrReport) -> fmt::Result {
    writeln!(f, "Grid anchors around {} primes q > 7", r.primes_tested)?;
    writeln!(f, "{:>6} {:>8} {:>10} {:>10}", "filter", "modulus", "failures", "CFR")?;
    for row in &r.rows {
        writeln!(
            f,
            "{:>6} {:>8} {:>10} {:>9.4}%",
            row.filter.label(),
            row.modulus,
            row.failures,
            row.rate_percent
        )?;
    }
    let verdict = if r.decay_holds { "holds" } else { "does not hold" };
    writeln!(f, "Decay along the filters {verdict}")
}

fn write_violations(f: &mut fmt::Formatter<'_>, r: &ViolationReport) -> fmt::Result {
    writeln!(f, "Composite failures: {}", r.total_failures)?;
    for filter in &r.filters {
        writeln!(f)?;
        writeln!(
            f,
            "{} (mod {}), forbidden factors {:?}",
            filter.filter.label(),
            filter.modulus,
            filter.forbidden_factors
        )?;
        writeln!(
            f,
            "  perfect anchors: {}, failures among them: {}",
            filter.perfect_anchors, filter.perfect_failures
        )?;
        let ks: Vec<String> = filter.failures_by_k.iter().map(|c| c.k.to_string()).collect();
        writeln!(f, "  failure distances: [{}]", ks.join(", "))?;
        writeln!(f, "  violations: {}", filter.violation_count)?;
        if let Some(first) = filter.first_violation() {
            writeln!(
                f,
                "  first: n={} S={} q={} k={}",
                first.index, first.anchor, first.neighbor_prime, first.k_min
            )?;
        }
    }
    writeln!(f)?;
    let verdict = if r.falsified { "FALSIFIED" } else { "holds" };
    writeln!(f, "Forbidden-factor invariant {verdict}")
}

fn write_residues(f: &mut fmt::Formatter<'_>, r: &ResidueReport) -> fmt::Result {
    writeln!(
        f,
        "Failures by S mod {}: {} total",
        r.modulus, r.total_failures
    )?;
    let reachable: Vec<String> = r.reachable_residues.iter().map(u64::to_string).collect();
    writeln!(f, "Reachable residues: {{{}}}", reachable.join(", "))?;
    // Residue 0 always prints: its forbidden-distance check is the verdict.
    for class in r.classes.iter().filter(|c| c.failures > 0 || c.residue == 0) {
        let top: Vec<String> = class
            .top
            .iter()
            .map(|share| format!("k={} ({:.1}%)", share.k, share.percent))
            .collect();
        writeln!(
            f,
            "{:>5}: {:>10} failures, {:>4} distinct  {}",
            class.residue,
            class.failures,
            class.distinct_distances,
            top.join(", ")
        )?;
        if let Some(forbidden) = &class.forbidden_distances {
            if forbidden.is_empty() {
                writeln!(f, "       no forbidden distances")?;
            } else {
                writeln!(f, "       forbidden distances: {forbidden:?}")?;
            }
        }
    }
    Ok(())
}

fn write_gap_by_distance(f: &mut fmt::Formatter<'_>, r: &GapReport) -> fmt::Result {
    writeln!(
        f,
        "{} anchors, {} failures, overall mean gap {:.3}",
        r.anchors_analyzed, r.total_failures, r.overall_mean_gap
    )?;
    writeln!(f, "{:>6} {:>12} {:>10} {:>10}", "k", "count", "mean gap", "deviation")?;
    for row in &r.rows {
        writeln!(
            f,
            "{:>6} {:>12} {:>10.3} {:>+9.2}%",
            row.key, row.count, row.mean_gap, row.deviation_percent
        )?;
    }
    if let Some(other) = &r.other {
        writeln!(
            f,
            "{:>6} {:>12} {:>10.3} {:>+9.2}%",
            "other", other.count, other.mean_gap, other.deviation_percent
        )?;
    }
    Ok(())
}

fn write_gap_by_residue(f: &mut fmt::Formatter<'_>, r: &GapResidueReport) -> fmt::Result {
    writeln!(
        f,
        "{} anchors, overall mean gap {:.3}",
        r.anchors_analyzed, r.overall_mean_gap
    )?;
    for table in &r.tables {
        writeln!(f)?;
        writeln!(f, "S mod {} ({})", table.modulus, table.filter.label())?;
        for row in &table.rows {
            writeln!(
                f,
                "{:>5} {:>12} {:>10.3} {:>+9.2}%",
                row.key, row.count, row.mean_gap, row.deviation_percent
            )?;
        }
    }
    Ok(())
}

fn write_correction(f: &mut fmt::Formatter<'_>, r: &CorrectionSummary) -> fmt::Result {
    writeln!(
        f,
        "{} failures corrected within radius {}; largest radius used {}",
        r.total_failures, r.max_radius, r.max_radius_observed
    )?;
    writeln!(f, "{:>6} {:>12} {:>9} {:>11}", "r", "count", "percent", "cumulative")?;
    for row in &r.radius_rows {
        writeln!(
            f,
            "{:>6} {:>12} {:>8.3}% {:>10.3}%",
            row.radius, row.count, row.percent, row.cumulative_percent
        )?;
    }
    writeln!(f)?;
    writeln!(f, "Mean radius by S mod 30")?;
    for row in &r.by_residue {
        writeln!(
            f,
            "{:>5} {:>12} {:>8.3}",
            row.residue, row.failures, row.mean_radius
        )?;
    }
    for dist in &r.fix_distributions {
        writeln!(f)?;
        writeln!(
            f,
            "S_fix mod 30 for S mod 30 = {} ({} failures)",
            dist.anchor_residue, dist.failures
        )?;
        for share in &dist.rows {
            writeln!(
                f,
                "{:>5} {:>12} {:>8.3}%",
                share.residue, share.count, share.percent
            )?;
        }
    }
    Ok(())
}
