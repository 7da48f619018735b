//! CSV export of correction records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use pac_03_aggregation::CorrectionRecord;
use thiserror::Error;
use tracing::info;

pub const CSV_HEADER: &str = "n_index,Sn,q_prime,k_composite,Sn_mod6,Sn_mod30,Sn_mod210,\
fix_radius_r,S_fix,Sfix_mod6,Sfix_mod30,Sfix_mod210";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write the header and one row per record.
pub fn write_records<W: Write>(writer: &mut W, records: &[CorrectionRecord]) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            r.index,
            r.anchor,
            r.neighbor_prime,
            r.k_min,
            r.anchor_residues.mod6,
            r.anchor_residues.mod30,
            r.anchor_residues.mod210,
            r.radius,
            r.fix_anchor,
            r.fix_residues.mod6,
            r.fix_residues.mod30,
            r.fix_residues.mod210,
        )?;
    }
    Ok(())
}

/// Create (or truncate) `path` and export `records` into it.
pub fn export_csv(path: &Path, records: &[CorrectionRecord]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records)
        .and_then(|()| writer.flush())
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), rows = records.len(), "Correction records exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pac_02_anchor_search::ResidueSignature;

    fn record() -> CorrectionRecord {
        CorrectionRecord {
            index: 4,
            anchor: 700,
            neighbor_prime: 691,
            k_min: 9,
            anchor_residues: ResidueSignature::of(700),
            radius: 1,
            fix_index: 3,
            fix_anchor: 500,
            fix_residues: ResidueSignature::of(500),
        }
    }

    #[test]
    fn test_write_records_layout() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &[record()]).expect("in-memory write");
        let text = String::from_utf8(buffer).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), 12, "twelve columns");
        assert_eq!(lines[1], "4,700,691,9,4,10,70,1,500,2,20,80");
    }

    #[test]
    fn test_export_csv_to_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("records.csv");
        export_csv(&path, &[record(), record()]).expect("export");

        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.starts_with("n_index,Sn,q_prime"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_empty_export_has_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.csv");
        export_csv(&path, &[]).expect("export");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(text.trim_end(), CSV_HEADER);
    }

    #[test]
    fn test_missing_directory_is_create_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("records.csv");
        let err = export_csv(&path, &[record()]).expect_err("parent does not exist");
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
