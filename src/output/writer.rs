// src/output/writer.rs
//! Atomic output writing and the id post-sort.
//!
//! Rows are written to a temporary file next to the destination and renamed
//! into place once complete, so a failed run never leaves a partial file.
//! A replaced file keeps its permissions; a new one gets the usual umask mode.

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::input::read_tsv;
use crate::utils::constants::{FIELD_DELIMITER, LINE_TERMINATOR};

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Tab-separated writer with CRLF terminators. Fields are never quoted and
/// rows may differ in width.
pub fn writer_builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(LINE_TERMINATOR);
    builder
}

#[cfg(unix)]
fn create_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    // open(2) masks this with the process umask
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Writes one record per row to `path`, replacing it atomically.
pub fn write_rows<I, R, F>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let temp = create_temp_file(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    let mut written = 0;
    {
        let mut writer = writer_builder().from_writer(temp.as_file());
        for row in rows {
            writer
                .write_record(row)
                .with_context(|| format!("Failed to write row {} of {}", written + 1, path.display()))?;
            written += 1;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;
    }

    temp.persist(path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    debug!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

/// Field `column` of a row, or `""` when the row is shorter.
fn sort_field(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Stable sort of rows by one column. Rows with equal keys keep their
/// relative order.
pub fn sort_rows_by_id(rows: &mut [Vec<String>], column: usize) {
    rows.sort_by(|a, b| sort_field(a, column).cmp(sort_field(b, column)));
}

/// Re-sorts the file at `path` in place by `column`. Every row is written
/// back with a CRLF terminator.
pub fn sort_file_by_column(path: &Path, column: usize) -> Result<usize> {
    let mut rows = read_tsv(path, 0)
        .with_context(|| format!("Failed to read {} for sorting", path.display()))?;
    sort_rows_by_id(&mut rows, column);
    let count = write_rows(path, &rows)?;
    info!("Sorted {} rows of {} by column {}", count, path.display(), column);
    Ok(count)
}
