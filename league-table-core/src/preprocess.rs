use std::fs;

use tracing::{debug, error, info};

use crate::contract::{ProcessError, ProcessInput, ProcessedLeague};
pub use crate::contract::{Preprocessor, ProcessConfig};
use crate::render::{render_html, write_html};
use crate::results::read_matches;
use crate::standings::compute_standings;

/// Reads a league spreadsheet, computes the standings and writes the HTML table.
pub struct Processor {
    config: ProcessConfig,
}

impl Processor {
    pub fn new(config: ProcessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Synchronous process logic for unit tests and internal use.
    pub fn process_sync(&self, input: ProcessInput) -> Result<ProcessedLeague, ProcessError> {
        let config = &self.config;
        info!(
            league = %input.league,
            sheet = %input.sheet_path.display(),
            "Starting processing for league"
        );

        let matches = read_matches(&input.sheet_path, &config.layout)?;
        let table = compute_standings(&matches);
        info!(
            league = %input.league,
            matches = matches.len(),
            teams = table.len(),
            "Computed standings"
        );
        match serde_json::to_string_pretty(&table) {
            Ok(json) => debug!(league = %input.league, json = %json, "Standings as JSON"),
            Err(e) => error!(league = %input.league, error = ?e, "Failed to serialize standings"),
        }

        if !config.output_dir.exists() {
            fs::create_dir_all(&config.output_dir).map_err(|e| {
                error!(error = ?e, path = %config.output_dir.display(), "Failed to create output directory");
                e
            })?;
        }
        let html_path = config
            .output_dir
            .join(config.render.html_file_name(&input.league));
        let html = render_html(&table);
        write_html(&html_path, &html, config.render.encoding).map_err(|e| {
            error!(error = ?e, path = %html_path.display(), "Failed to write HTML table");
            e
        })?;

        Ok(ProcessedLeague {
            league: input.league,
            html_path,
            matches: matches.len(),
            table,
        })
    }
}

#[async_trait::async_trait]
impl Preprocessor for Processor {
    async fn process(&self, input: ProcessInput) -> Result<ProcessedLeague, ProcessError> {
        self.process_sync(input)
    }
}
