// src/input/tsv.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::utils::constants::FIELD_DELIMITER;

/// Tab-separated reader that never interprets quotes and tolerates rows of
/// any width. Header lines are skipped by the caller.
pub fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false);
    builder
}

/// Reads a TSV export, discarding `header_lines` leading records.
pub fn read_tsv(path: &Path, header_lines: usize) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let rows = parse_tsv_reader(file, header_lines)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    debug!("Read {} data rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Splits each data record on tabs. CR, LF and CRLF all end a record and
/// blank lines are skipped.
pub fn parse_tsv_reader<R: Read>(reader: R, header_lines: usize) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut skipped = 0;
    for (i, record) in reader_builder().from_reader(reader).records().enumerate() {
        let record = record.with_context(|| format!("Failed to read record {}", i + 1))?;
        if skipped < header_lines {
            skipped += 1;
            continue;
        }
        if is_blank(&record) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    if skipped < header_lines {
        warn!(
            "Input ended after {} of {} expected header lines",
            skipped, header_lines
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str, header_lines: usize) -> Vec<Vec<String>> {
        parse_tsv_reader(content.as_bytes(), header_lines).unwrap()
    }

    #[test]
    fn test_skips_headers_and_strips_carriage_returns() {
        let rows = parse("h1\nh2\na\tb\r\nc\t\td\n", 2);
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "", "d"]]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let rows = parse("h1\nh2\n\r\nx\ty\n \t\n\n", 2);
        assert_eq!(rows, vec![vec!["x", "y"]]);
    }

    #[test]
    fn test_quotes_are_kept_literally() {
        let rows = parse("h\n\"quoted\ttitle\"\tplain \"inner\"\n", 1);
        assert_eq!(rows, vec![vec!["\"quoted", "title\"", "plain \"inner\""]]);
    }

    #[test]
    fn test_headers_may_be_wider_than_data() {
        let rows = parse("h1\th2\th3\th4\na\tb\n", 1);
        assert_eq!(rows, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_short_input_yields_no_rows() {
        assert!(parse("only one header\n", 2).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_tsv(Path::new("/nonexistent/affmerge/input.txt"), 2).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
