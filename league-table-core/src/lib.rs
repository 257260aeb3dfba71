#![doc = "league-table-core: core logic library for league-table."]

//! This crate holds the data models, the standings computation and the
//! pipelines behind the `league-table` CLI. Concrete transport clients that
//! need native libraries (the SFTP session) live in the CLI crate and plug in
//! through the traits in [`contract`].
//!
//! # Usage
//! Add this as a dependency for all shared download, processing, rendering
//! and remote-sync code.

pub mod config;
pub mod contract;
pub mod download;
pub mod preprocess;
pub mod remote;
pub mod render;
pub mod results;
pub mod standings;
pub mod synchronise;
