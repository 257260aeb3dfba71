//! Reading match results out of a league spreadsheet.
//!
//! Cleaning policy, applied in this order:
//! 1. rows above and including the header row are not data;
//! 2. `trailing_rows` summary rows at the bottom are dropped;
//! 3. rows with an empty home, guest or score cell are dropped;
//! 4. rows whose score is not `<digits> : <digits>` (whitespace around the
//!    colon optional) are dropped.
//!
//! Dropped rows are not errors. Errors are reserved for a workbook that
//! cannot be read or does not have the configured shape.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use calamine::{open_workbook_auto, Data, Reader};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::SheetLayout;
use crate::standings::MatchRecord;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to read sheet '{sheet}' from {path}: {source}")]
    Sheet {
        sheet: String,
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("header row {row} is past the end of the sheet ({rows} rows)")]
    HeaderRow { row: usize, rows: usize },
    #[error("column '{column}' not found in header row")]
    MissingColumn { column: String },
}

fn score_pattern() -> &'static Regex {
    static SCORE: OnceLock<Regex> = OnceLock::new();
    SCORE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*:\s*(\d+)\s*$").expect("score pattern is valid"))
}

/// Splits a final-score string such as `"52 : 73"` into `(home, guest)`.
///
/// Anything else, including numbers too large for `u32`, gives `None`.
pub fn parse_score(score: &str) -> Option<(u32, u32)> {
    let caps = score_pattern().captures(score)?;
    let home = caps[1].parse().ok()?;
    let guest = caps[2].parse().ok()?;
    Some((home, guest))
}

fn column_index(header: &[String], column: &str) -> Result<usize, LoadError> {
    header
        .iter()
        .position(|cell| cell.trim() == column)
        .ok_or_else(|| {
            error!(column = %column, ?header, "Column missing from header row");
            LoadError::MissingColumn {
                column: column.to_string(),
            }
        })
}

/// Extracts match records from sheet rows.
///
/// `rows[i]` is sheet row `i`; the header sits at `layout.header_row`.
pub fn extract_matches(
    rows: &[Vec<String>],
    layout: &SheetLayout,
) -> Result<Vec<MatchRecord>, LoadError> {
    let header = rows.get(layout.header_row).ok_or_else(|| {
        error!(row = layout.header_row, rows = rows.len(), "Header row out of range");
        LoadError::HeaderRow {
            row: layout.header_row,
            rows: rows.len(),
        }
    })?;
    let home_col = column_index(header, &layout.home_column)?;
    let guest_col = column_index(header, &layout.guest_column)?;
    let score_col = column_index(header, &layout.score_column)?;

    let body = &rows[layout.header_row + 1..];
    let body = &body[..body.len().saturating_sub(layout.trailing_rows)];

    let mut matches = Vec::with_capacity(body.len());
    for (offset, row) in body.iter().enumerate() {
        let sheet_row = layout.header_row + 1 + offset;
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");
        let (home, guest, score) = (cell(home_col), cell(guest_col), cell(score_col));

        if home.is_empty() || guest.is_empty() || score.is_empty() {
            debug!(row = sheet_row, "Skipping incomplete row");
            continue;
        }
        let Some((home_points, guest_points)) = parse_score(score) else {
            debug!(row = sheet_row, score = %score, "Skipping row without final score");
            continue;
        };
        matches.push(MatchRecord::new(home, guest, home_points, guest_points));
    }
    Ok(matches)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Reads the configured sheet of the workbook at `path` and extracts its
/// match records.
pub fn read_matches(path: &Path, layout: &SheetLayout) -> Result<Vec<MatchRecord>, LoadError> {
    info!(path = %path.display(), sheet = %layout.name, "Reading results sheet");
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to open workbook");
        LoadError::Workbook {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    let range = workbook.worksheet_range(&layout.name).map_err(|e| {
        error!(error = ?e, sheet = %layout.name, "Failed to read worksheet");
        LoadError::Sheet {
            sheet: layout.name.clone(),
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    // The range starts at its first used cell; pad so rows[i] is sheet row i.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let rows: Vec<Vec<String>> = std::iter::repeat_with(Vec::new)
        .take(first_row)
        .chain(range.rows().map(|row| row.iter().map(cell_text).collect()))
        .collect();

    let matches = extract_matches(&rows, layout)?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        matches = matches.len(),
        "Extracted match records"
    );
    Ok(matches)
}
