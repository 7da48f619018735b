//! Text listing adapter: one unsigned integer per line, ascending.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::UniverseError;
use crate::ports::PrimeSource;

/// Reads a prime listing from a text file.
#[derive(Clone, Debug)]
pub struct TextFilePrimeSource {
    path: PathBuf,
    max_count: Option<usize>,
}

impl TextFilePrimeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_count: None,
        }
    }

    /// Stop after the first `count` primes.
    pub fn with_max_count(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrimeSource for TextFilePrimeSource {
    fn describe(&self) -> String {
        match self.max_count {
            Some(count) => format!("{} (first {})", self.path.display(), count),
            None => self.path.display().to_string(),
        }
    }

    fn load(&self) -> Result<Vec<u64>, UniverseError> {
        let file = File::open(&self.path).map_err(|source| UniverseError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), "Reading prime listing");
        parse_listing(BufReader::new(file), self.max_count).map_err(|e| match e {
            UniverseError::Io { source, .. } => UniverseError::Io {
                path: self.path.display().to_string(),
                source,
            },
            other => other,
        })
    }
}

/// Parse a listing from any buffered reader.
///
/// Blank lines are skipped; surrounding whitespace is ignored. Line numbers in
/// errors are 1-based.
pub fn parse_listing<R: BufRead>(
    reader: R,
    max_count: Option<usize>,
) -> Result<Vec<u64>, UniverseError> {
    let limit = max_count.unwrap_or(usize::MAX);
    let mut primes = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        if primes.len() >= limit {
            break;
        }
        let line = line.map_err(|source| UniverseError::Io {
            path: "<reader>".to_string(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<u64>().map_err(|_| UniverseError::Parse {
            line: number + 1,
            content: trimmed.to_string(),
        })?;
        primes.push(value);
    }

    Ok(primes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_parse_listing_skips_blank_lines_and_whitespace() {
        let input = "2\n3\n\n  5 \n7\r\n";
        let primes = parse_listing(Cursor::new(input), None).expect("valid listing");
        assert_eq!(primes, vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_parse_listing_respects_max_count() {
        let input = "2\n3\n5\n7\n11\n";
        let primes = parse_listing(Cursor::new(input), Some(3)).expect("valid listing");
        assert_eq!(primes, vec![2, 3, 5]);
    }

    #[test]
    fn test_parse_listing_reports_line_number() {
        let input = "2\n3\nfive\n7\n";
        let result = parse_listing(Cursor::new(input), None);
        match result {
            Err(UniverseError::Parse { line, content }) => {
                assert_eq!(line, 3);
                assert_eq!(content, "five");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_text_file_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "2\n3\n5\n7\n11\n13").expect("write listing");

        let source = TextFilePrimeSource::new(file.path()).with_max_count(4);
        assert!(source.describe().contains("first 4"));
        assert_eq!(source.load().expect("load"), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_text_file_source_missing_file_is_io_error() {
        let source = TextFilePrimeSource::new("/definitely/not/here/primes.txt");
        match source.load() {
            Err(UniverseError::Io { path, .. }) => assert!(path.ends_with("primes.txt")),
            other => panic!("Expected I/O error, got {:?}", other),
        }
    }
}
