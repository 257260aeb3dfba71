//! Per-league pipeline: download → process (load, aggregate, render, write).
//!
//! Leagues run one after another in list order; a league's steps never
//! overlap with the next league's. [`synchronise`] stops at the first failing
//! league and names it in the error. Callers that want to carry on past a
//! broken league drive [`process_league`] themselves.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{LeagueSource, SheetLayout};
use crate::contract::{Downloader, Preprocessor, ProcessError, ProcessInput, ProcessedLeague};
use crate::download::DownloadError;
use crate::results::read_matches;
use crate::standings::MatchRecord;

#[derive(Debug, Error)]
pub enum SynchroniseError {
    #[error("download failed for league {league}: {source}")]
    Download {
        league: String,
        #[source]
        source: DownloadError,
    },
    #[error("processing failed for league {league}: {source}")]
    Process {
        league: String,
        #[source]
        source: ProcessError,
    },
}

impl SynchroniseError {
    pub fn league(&self) -> &str {
        match self {
            SynchroniseError::Download { league, .. } | SynchroniseError::Process { league, .. } => {
                league
            }
        }
    }
}

/// Outcome of a full run, one entry per league in processing order.
#[derive(Debug, Serialize)]
pub struct SynchroniseReport {
    pub leagues: Vec<LeagueReport>,
}

#[derive(Debug, Serialize)]
pub struct LeagueReport {
    pub league: String,
    pub html_path: std::path::PathBuf,
    pub matches: usize,
    pub table: crate::standings::StandingsTable,
}

impl From<ProcessedLeague> for LeagueReport {
    fn from(p: ProcessedLeague) -> Self {
        Self {
            league: p.league,
            html_path: p.html_path,
            matches: p.matches,
            table: p.table,
        }
    }
}

/// Downloads and processes one league.
pub async fn process_league<D, P>(
    downloader: &D,
    processor: &P,
    league: &LeagueSource,
) -> Result<ProcessedLeague, SynchroniseError>
where
    D: Downloader + ?Sized,
    P: Preprocessor + ?Sized,
{
    info!(league = %league.name, "[SYNC] Starting download for league");
    let sheet = downloader.download(league).await.map_err(|e| {
        error!(league = %league.name, error = ?e, "[SYNC][ERROR] Download failed");
        SynchroniseError::Download {
            league: league.name.clone(),
            source: e,
        }
    })?;
    info!(league = %league.name, path = %sheet.path().display(), "[SYNC] Download succeeded");

    let input = ProcessInput {
        league: league.name.clone(),
        sheet_path: sheet.path().to_path_buf(),
    };
    // `sheet` must outlive processing: staged downloads vanish on drop.
    let processed = processor.process(input).await.map_err(|e| {
        error!(league = %league.name, error = ?e, "[SYNC][ERROR] Process step failed");
        SynchroniseError::Process {
            league: league.name.clone(),
            source: e,
        }
    })?;
    drop(sheet);

    info!(
        league = %processed.league,
        teams = processed.table.len(),
        html = %processed.html_path.display(),
        "[SYNC] League processed"
    );
    Ok(processed)
}

/// Runs every league in order, failing fast.
pub async fn synchronise<D, P>(
    downloader: &D,
    processor: &P,
    leagues: &[LeagueSource],
) -> Result<SynchroniseReport, SynchroniseError>
where
    D: Downloader + ?Sized,
    P: Preprocessor + ?Sized,
{
    info!(leagues = leagues.len(), "[SYNC] Starting standings pipeline");
    let mut reports = Vec::with_capacity(leagues.len());
    for league in leagues {
        let processed = process_league(downloader, processor, league).await?;
        reports.push(LeagueReport::from(processed));
    }
    info!(leagues = reports.len(), "[SYNC] All leagues processed");
    Ok(SynchroniseReport { leagues: reports })
}

/// Downloads one league's spreadsheet and returns its cleaned match records.
pub async fn fetch_matches<D>(
    downloader: &D,
    league: &LeagueSource,
    layout: &SheetLayout,
) -> Result<Vec<MatchRecord>, SynchroniseError>
where
    D: Downloader + ?Sized,
{
    let sheet = downloader.download(league).await.map_err(|e| {
        error!(league = %league.name, error = ?e, "Download failed while fetching matches");
        SynchroniseError::Download {
            league: league.name.clone(),
            source: e,
        }
    })?;
    read_matches(sheet.path(), layout).map_err(|e| {
        error!(league = %league.name, error = ?e, "Failed to read matches from spreadsheet");
        SynchroniseError::Process {
            league: league.name.clone(),
            source: ProcessError::Load(e),
        }
    })
}
