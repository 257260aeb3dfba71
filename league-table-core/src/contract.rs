//! # contract: trait seams between the pipeline and its collaborators
//!
//! The pipeline talks to three collaborators only through the traits below:
//! - [`Downloader`] fetches one league's result spreadsheet to local disk.
//! - [`Preprocessor`] turns a local spreadsheet into a standings table and an
//!   HTML file.
//! - [`RemoteSession`] is a connected file-transfer session (SFTP in the CLI).
//!
//! All three are annotated for `mockall`, so tests can drive the pipeline and
//! the remote-sync flow without network access. Mocks are exported when the
//! `test-export-mocks` feature is on (default).

use async_trait::async_trait;
use mockall::automock;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

use crate::config::{LeagueSource, RenderConfig, SheetLayout};
use crate::download::DownloadError;
use crate::remote::{RemoteEntry, RemoteError, RemoteTarget};
use crate::results::LoadError;
use crate::standings::StandingsTable;

/// A league spreadsheet that is available on local disk.
///
/// Staged downloads are removed when this value is dropped.
#[derive(Debug)]
pub struct DownloadedSheet {
    pub league: LeagueSource,
    local_path: PathBuf,
    _staged: Option<TempPath>,
}

impl DownloadedSheet {
    /// A spreadsheet that stays on disk after processing.
    pub fn kept(league: LeagueSource, local_path: PathBuf) -> Self {
        Self {
            league,
            local_path,
            _staged: None,
        }
    }

    /// A spreadsheet living in a temp file, deleted on drop.
    pub fn staged(league: LeagueSource, temp: TempPath) -> Self {
        Self {
            league,
            local_path: temp.to_path_buf(),
            _staged: Some(temp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.local_path
    }
}

/// Fetches a league's result spreadsheet.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, league: &LeagueSource) -> Result<DownloadedSheet, DownloadError>;
}

/// Processor configuration: how spreadsheets are read and tables written.
#[derive(Debug, Clone, Default)]
pub struct ProcessConfig {
    pub output_dir: PathBuf,
    pub layout: SheetLayout,
    pub render: RenderConfig,
}

/// Input for the processing step: one league and its local spreadsheet.
#[derive(Debug, Clone)]
pub struct ProcessInput {
    pub league: String,
    pub sheet_path: PathBuf,
}

/// Output of the processing step.
#[derive(Debug, Clone)]
pub struct ProcessedLeague {
    pub league: String,
    pub html_path: PathBuf,
    pub matches: usize,
    pub table: StandingsTable,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to load results: {0}")]
    Load(#[from] LoadError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a local spreadsheet into a standings table and its HTML file.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Preprocessor: Send + Sync {
    async fn process(&self, input: ProcessInput) -> Result<ProcessedLeague, ProcessError>;
}

/// A file-transfer session against one remote host.
///
/// Implementations are blocking. Callers own the session for the duration of
/// one transfer run and must call [`RemoteSession::disconnect`] on every exit
/// path once `connect` succeeded; [`crate::remote::transfer`] does that.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait RemoteSession {
    fn connect(&mut self, target: &RemoteTarget) -> Result<(), RemoteError>;

    fn disconnect(&mut self) -> Result<(), RemoteError>;

    /// Entries of a remote directory.
    fn list(&mut self, path: &Path) -> Result<Vec<RemoteEntry>, RemoteError>;

    fn upload(&mut self, local: &Path, remote: &Path) -> Result<(), RemoteError>;

    /// Fetches `remote` into `local`, creating the local parent directory if needed.
    fn download(&mut self, remote: &Path, local: &Path) -> Result<(), RemoteError>;
}
