use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// One league: where its results come from and what its outputs are called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSource {
    /// Short display name, used in the HTML file name (e.g. `U12`).
    pub name: String,
    /// External numeric league identifier of the results portal.
    pub league_id: String,
    /// Keep the downloaded spreadsheet under this file name in the output
    /// directory. When absent the spreadsheet only lives in a temp file.
    #[serde(default)]
    pub table_file: Option<PathBuf>,
}

impl LeagueSource {
    pub fn trace_loaded(&self) {
        info!(
            league = %self.name,
            league_id = %self.league_id,
            table_file = ?self.table_file,
            "Loaded league source"
        );
    }
}

/// Where the results sit inside the downloaded workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Worksheet holding the results.
    pub name: String,
    /// Zero-based sheet row holding the column names.
    pub header_row: usize,
    pub home_column: String,
    pub guest_column: String,
    /// Column holding the final score string (`"52 : 73"`).
    pub score_column: String,
    /// Summary rows at the bottom of the sheet that are not matches.
    pub trailing_rows: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            name: "Ergebnisse".to_string(),
            header_row: 1,
            home_column: "Heimmannschaft".to_string(),
            guest_column: "Gastmannschaft".to_string(),
            score_column: "Endstand".to_string(),
            trailing_rows: 1,
        }
    }
}

/// Text encoding of the written HTML files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// Little-endian with a byte order mark.
    #[default]
    #[serde(rename = "utf-16", alias = "utf16")]
    Utf16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub encoding: OutputEncoding,
    pub file_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            encoding: OutputEncoding::default(),
            file_prefix: "Tabelle_".to_string(),
        }
    }
}

impl RenderConfig {
    /// File name of the HTML table for `league`.
    pub fn html_file_name(&self, league: &str) -> String {
        format!("{}{}.html", self.file_prefix, league)
    }

    pub fn trace_loaded(&self) {
        info!(encoding = ?self.encoding, prefix = %self.file_prefix, "Loaded render config");
        debug!(?self, "Render config loaded (full debug)");
    }
}
