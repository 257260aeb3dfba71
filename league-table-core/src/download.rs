use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::LeagueSource;
use crate::contract::{DownloadedSheet, Downloader};

/// Download configuration: the export endpoint and where spreadsheets land.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DownloadConfig {
    /// Spreadsheet export servlet of the results portal.
    pub base_url: String,
    /// Value of the trailing `sessionkey` query parameter.
    pub session_key: String,
    pub output_dir: PathBuf,
}

impl DownloadConfig {
    /// Export URL for one league.
    ///
    /// The session key is appended verbatim; the portal expects its slashes
    /// unescaped.
    pub fn league_url(&self, league_id: &str) -> String {
        format!(
            "{}?liga_id={}&sessionkey={}",
            self.base_url, league_id, self.session_key
        )
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to store spreadsheet at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Suffix for staged spreadsheets; the workbook reader picks its format by extension.
const STAGED_SUFFIX: &str = ".xls";

/// Fetches league spreadsheets over HTTP with reqwest.
pub struct DefaultDownloader {
    config: DownloadConfig,
    client: reqwest::Client,
}

impl DefaultDownloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(config: DownloadConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to send spreadsheet request");
            DownloadError::Request {
                url: url.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Results portal returned error status");
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to read spreadsheet body");
            DownloadError::Request {
                url: url.to_string(),
                source: e,
            }
        })?;
        debug!(url = %url, size = body.len(), "Fetched spreadsheet body");
        Ok(body.to_vec())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DownloadError {
    error!(error = ?source, path = %path.display(), "Failed to store spreadsheet");
    DownloadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait::async_trait]
impl Downloader for DefaultDownloader {
    async fn download(&self, league: &LeagueSource) -> Result<DownloadedSheet, DownloadError> {
        let url = self.config.league_url(&league.league_id);
        info!(league = %league.name, url = %url, "Downloading league spreadsheet");
        let body = self.fetch_bytes(&url).await?;

        match &league.table_file {
            Some(table_file) => {
                let out_dir = &self.config.output_dir;
                if !out_dir.exists() {
                    fs::create_dir_all(out_dir).map_err(|e| io_error(out_dir, e))?;
                    debug!(path = %out_dir.display(), "Created output directory");
                }
                let path = out_dir.join(table_file);
                fs::write(&path, &body).map_err(|e| io_error(&path, e))?;
                info!(league = %league.name, path = %path.display(), "Saved league spreadsheet");
                Ok(DownloadedSheet::kept(league.clone(), path))
            }
            None => {
                let mut staged = tempfile::Builder::new()
                    .prefix("league-")
                    .suffix(STAGED_SUFFIX)
                    .tempfile()
                    .map_err(|e| io_error(&std::env::temp_dir(), e))?;
                staged
                    .write_all(&body)
                    .map_err(|e| io_error(staged.path(), e))?;
                let temp = staged.into_temp_path();
                info!(league = %league.name, path = %temp.display(), "Staged league spreadsheet");
                Ok(DownloadedSheet::staged(league.clone(), temp))
            }
        }
    }
}
