//! HTML and plain-text rendering of a [`StandingsTable`].

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::OutputEncoding;
use crate::standings::{Standing, StandingsTable};

/// Header cells of the HTML table, in column order.
pub const COLUMNS: [&str; 8] = [
    "Team",
    "Games",
    "Wins",
    "Losses",
    "Points",
    "Points Made",
    "Points Get",
    "Diff",
];

fn stat_cells(row: &Standing) -> [String; 7] {
    let s = &row.stats;
    [
        s.games.to_string(),
        s.wins.to_string(),
        s.losses.to_string(),
        s.points.to_string(),
        s.points_made.to_string(),
        s.points_conceded.to_string(),
        s.diff.to_string(),
    ]
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Bordered HTML table with a centered header row, one row per team in
/// table order.
pub struct HtmlTable<'a>(pub &'a StandingsTable);

impl fmt::Display for HtmlTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<table border=\"1\" class=\"dataframe\">")?;
        writeln!(f, "  <thead>")?;
        writeln!(f, "    <tr style=\"text-align: center;\">")?;
        for column in COLUMNS {
            writeln!(f, "      <th>{column}</th>")?;
        }
        writeln!(f, "    </tr>")?;
        writeln!(f, "  </thead>")?;
        writeln!(f, "  <tbody>")?;
        for row in self.0 {
            writeln!(f, "    <tr>")?;
            writeln!(f, "      <td>{}</td>", escape(&row.team))?;
            for cell in stat_cells(row) {
                writeln!(f, "      <td>{cell}</td>")?;
            }
            writeln!(f, "    </tr>")?;
        }
        writeln!(f, "  </tbody>")?;
        write!(f, "</table>")
    }
}

pub fn render_html(table: &StandingsTable) -> String {
    HtmlTable(table).to_string()
}

/// Encodes `html` for writing. UTF-16 output is little-endian with a BOM.
pub fn encode(html: &str, encoding: OutputEncoding) -> Vec<u8> {
    match encoding {
        OutputEncoding::Utf8 => html.as_bytes().to_vec(),
        OutputEncoding::Utf16 => {
            let mut bytes = Vec::with_capacity(2 + html.len() * 2);
            bytes.extend_from_slice(&[0xFF, 0xFE]);
            for unit in html.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            bytes
        }
    }
}

pub fn write_html(path: &Path, html: &str, encoding: OutputEncoding) -> std::io::Result<()> {
    fs::write(path, encode(html, encoding))?;
    info!(path = %path.display(), ?encoding, "HTML table saved");
    Ok(())
}

/// Fixed-width text preview of the first `limit` rows, for terminal output.
pub fn render_text(table: &StandingsTable, limit: usize) -> String {
    let team_width = table
        .iter()
        .take(limit)
        .map(|row| row.team.chars().count())
        .chain(std::iter::once(COLUMNS[0].len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<team_width$}", COLUMNS[0]);
    for column in &COLUMNS[1..] {
        out.push_str(&format!("  {column:>11}"));
    }
    for row in table.iter().take(limit) {
        out.push('\n');
        out.push_str(&format!("{:<team_width$}", row.team));
        for value in stat_cells(row) {
            out.push_str(&format!("  {value:>11}"));
        }
    }
    out
}
