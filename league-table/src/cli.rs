///
/// This module implements the CLI interface for league-table: command
/// parsing, the async `run` entry point and user-visible output.
///
/// Business logic (downloading, standings, rendering, transfer flow) lives in
/// `league-table-core`; this module only wires configuration, concrete
/// clients and terminal interaction together.
use crate::load_config::{load_config, remote_target_from_env, CliConfig};
use crate::sftp::SftpSession;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use league_table_core::download::DefaultDownloader;
use league_table_core::preprocess::Processor;
use league_table_core::remote::{
    cleanup_downloads, keep_downloads_answer, list_remote, transfer, TransferPlan,
};
use league_table_core::render::render_text;
use league_table_core::synchronise::synchronise;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Rows shown per league in the terminal preview.
const PREVIEW_ROWS: usize = 5;

/// CLI for league-table: build standings tables and sync them to a server.
#[derive(Parser)]
#[clap(
    name = "league-table",
    version,
    about = "Build league standings tables from result spreadsheets and sync them over SFTP"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every configured league and write its standings table as HTML
    Standings {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Print the tables as JSON instead of a text preview
        #[clap(long)]
        json: bool,
    },
    /// Upload the configured files to the remote server
    Upload {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Download every uploaded file back as a local copy
        #[clap(long)]
        download: bool,
        /// Keep downloaded copies without asking
        #[clap(long, conflicts_with = "remove_downloads")]
        keep_downloads: bool,
        /// Remove downloaded copies without asking
        #[clap(long)]
        remove_downloads: bool,
    },
    /// List a directory on the remote server
    List {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Remote directory
        #[clap(default_value = "/")]
        path: String,
    },
}

/// Asks whether downloaded copies should be kept. Only `n` means no.
pub fn ask_keep_downloads<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<bool> {
    write!(output, "You want to keep the downloads? (y/n): ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(keep_downloads_answer(&answer))
}

async fn run_standings(config: CliConfig, json: bool) -> Result<()> {
    let downloader = DefaultDownloader::new(config.download.clone());
    let processor = Processor::new(config.process_config());

    tracing::info!(command = "standings", leagues = config.leagues.len(), "Starting standings run");
    let report = synchronise(&downloader, &processor, &config.leagues)
        .await
        .map_err(|e| {
            tracing::error!(command = "standings", error = %e, "Standings run failed");
            anyhow::Error::new(e)
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for league in &report.leagues {
            println!("{} ({} matches)", league.league, league.matches);
            println!("{}", render_text(&league.table, PREVIEW_ROWS));
            println!(
                "HTML table has been saved as '{}'\n",
                league.html_path.display()
            );
        }
    }
    tracing::info!(command = "standings", leagues = report.leagues.len(), "Standings run complete");
    Ok(())
}

async fn run_upload(
    config: CliConfig,
    download: bool,
    keep_downloads: bool,
    remove_downloads: bool,
) -> Result<()> {
    let target = remote_target_from_env(&config.remote)?;
    let plan = TransferPlan::from_config(&config.remote, &config.download.output_dir, download);

    tracing::info!(
        command = "upload",
        files = plan.files.len(),
        download,
        "Starting remote transfer"
    );
    let report = tokio::task::spawn_blocking(move || {
        let mut session = SftpSession::new();
        transfer(&mut session, &target, &plan)
    })
    .await
    .context("transfer task did not complete")??;

    for path in &report.uploaded {
        println!("uploaded {}", path.display());
    }
    for path in &report.downloaded {
        println!("downloaded {}", path.display());
    }

    if report.downloaded.is_empty() {
        return Ok(());
    }
    let keep = if keep_downloads {
        true
    } else if remove_downloads {
        false
    } else {
        ask_keep_downloads(io::stdin().lock(), io::stdout())?
    };
    if !keep {
        let removed = cleanup_downloads(&report.downloaded)?;
        println!("removed {removed} downloaded file(s)");
    }
    Ok(())
}

async fn run_list(config: CliConfig, path: String) -> Result<()> {
    let target = remote_target_from_env(&config.remote)?;
    let entries = tokio::task::spawn_blocking(move || {
        let mut session = SftpSession::new();
        list_remote(&mut session, &target, std::path::Path::new(&path))
    })
    .await
    .context("list task did not complete")??;

    println!("mode\t\tsize\t\tatime\t\tmtime\t\tfilename");
    let show = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    for entry in entries {
        println!(
            "{}\t\t{}\t\t{}\t\t{}\t\t{}",
            entry
                .mode
                .map(|m| format!("{m:o}"))
                .unwrap_or_else(|| "-".to_string()),
            show(entry.size),
            show(entry.atime),
            show(entry.mtime),
            entry.filename
        );
    }
    Ok(())
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Standings { config, json } => {
            let config = load_config(config)?;
            run_standings(config, json).await
        }
        Commands::Upload {
            config,
            download,
            keep_downloads,
            remove_downloads,
        } => {
            let config = load_config(config)?;
            run_upload(config, download, keep_downloads, remove_downloads).await
        }
        Commands::List { config, path } => {
            let config = load_config(config)?;
            run_list(config, path).await
        }
    }
}
