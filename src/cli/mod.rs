//! Command-line parsing for the indicator snapshot tool.
//!
//! Flags left unset fall back to the environment (`.env`) and then to the
//! built-in defaults; that resolution lives in `app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "indicadores",
    version,
    about = "Daily economic indicator snapshot (BCE feed + optional FRED oil price)"
)]
pub struct Cli {
    /// Debug-level logging (overrides RUST_LOG).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the sources, write the snapshot JSON and print a summary.
    Run(RunArgs),
    /// Build a snapshot from a saved BCE feed file (no network, no oil).
    Parse(ParseArgs),
    /// Print the summary of an existing snapshot file.
    Show(ShowArgs),
}

/// Options for a live run.
#[derive(Debug, Parser, Clone, Default)]
pub struct RunArgs {
    /// BCE feed URL [env: BCE_SOURCE_URL].
    #[arg(long, value_name = "URL")]
    pub source: Option<String>,

    /// Output snapshot path [env: SNAPSHOT_OUT, default: ./public/datos_latest.json].
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    /// Window size per indicator [env: SERIES_LIMIT, default: 5].
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Skip the oil price even if FRED_API_KEY is set.
    #[arg(long)]
    pub no_oil: bool,

    /// FRED series used for the oil price [env: OIL_SERIES_ID, default: DCOILWTICO].
    #[arg(long, value_name = "ID")]
    pub oil_series: Option<String>,

    /// HTTP timeout in seconds [env: HTTP_TIMEOUT_SECS, default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Options for building a snapshot from a local file.
#[derive(Debug, Parser, Clone)]
pub struct ParseArgs {
    /// Saved BCE feed JSON.
    #[arg(short = 'i', long, value_name = "JSON")]
    pub input: PathBuf,

    /// Write the snapshot here instead of printing it.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    /// Window size per indicator [env: SERIES_LIMIT, default: 5].
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Options for showing a saved snapshot.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Snapshot JSON [env: SNAPSHOT_OUT, default: ./public/datos_latest.json].
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,
}
