//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - resolves the run configuration
//! - runs the snapshot pipeline
//! - writes the snapshot and prints the summary

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ParseArgs, RunArgs, ShowArgs};
use crate::data::{DEFAULT_FRED_BASE_URL, DEFAULT_OIL_SERIES, DEFAULT_SOURCE_URL, INDICATORS};
use crate::domain::{OilConfig, SnapshotConfig};
use crate::error::AppError;
use crate::extract::DEFAULT_LIMIT;

pub mod pipeline;

pub const ENV_SOURCE_URL: &str = "BCE_SOURCE_URL";
pub const ENV_OUT: &str = "SNAPSHOT_OUT";
pub const ENV_LIMIT: &str = "SERIES_LIMIT";
pub const ENV_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_FRED_API_KEY: &str = "FRED_API_KEY";
pub const ENV_OIL_SERIES: &str = "OIL_SERIES_ID";
pub const ENV_FRED_BASE_URL: &str = "FRED_BASE_URL";

pub const DEFAULT_OUT: &str = "./public/datos_latest.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Entry point for the `indicadores` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `indicadores` and `indicadores --flag` behave like `indicadores run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Parse(args) => handle_parse(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Logs go to stderr; stdout is reserved for the summary / JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = snapshot_config_from_args(&args, env_var)?;
    let snapshot = pipeline::run_snapshot(&config, &INDICATORS)?;

    crate::io::write_snapshot_json(&config.out_path, &snapshot)?;
    info!(path = %config.out_path.display(), "snapshot written");

    println!("{}", crate::report::format_snapshot_summary(&snapshot));
    Ok(())
}

fn handle_parse(args: ParseArgs) -> Result<(), AppError> {
    let limit = resolve_limit(args.limit, env_var)?;
    let snapshot = pipeline::snapshot_from_file(&args.input, &INDICATORS, limit)?;

    match &args.out {
        Some(path) => {
            crate::io::write_snapshot_json(path, &snapshot)?;
            info!(path = %path.display(), "snapshot written");
            println!("{}", crate::report::format_snapshot_summary(&snapshot));
        }
        None => println!("{}", crate::io::snapshot_to_string(&snapshot)?),
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let path = args
        .snapshot
        .or_else(|| env_var(ENV_OUT).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    let snapshot = crate::io::read_snapshot_json(&path)?;

    println!("{}", crate::report::format_snapshot_summary(&snapshot));
    Ok(())
}

/// Resolve flags > env > defaults into a `SnapshotConfig`.
///
/// `env` is the variable lookup (`std::env::var` in the binary).
pub fn snapshot_config_from_args(
    args: &RunArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SnapshotConfig, AppError> {
    let source_url = args
        .source
        .clone()
        .or_else(|| env(ENV_SOURCE_URL))
        .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

    let out_path = args
        .out
        .clone()
        .or_else(|| env(ENV_OUT).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));

    let limit = resolve_limit(args.limit, &env)?;

    let timeout_secs = match args.timeout {
        Some(secs) => secs,
        None => parse_env_number(&env, ENV_TIMEOUT)?.unwrap_or(DEFAULT_TIMEOUT_SECS),
    };
    if timeout_secs == 0 {
        return Err(AppError::new(2, "HTTP timeout must be > 0 seconds."));
    }

    let oil = if args.no_oil {
        None
    } else {
        env(ENV_FRED_API_KEY).map(|api_key| OilConfig {
            api_key,
            series_id: args
                .oil_series
                .clone()
                .or_else(|| env(ENV_OIL_SERIES))
                .unwrap_or_else(|| DEFAULT_OIL_SERIES.to_string()),
            base_url: env(ENV_FRED_BASE_URL).unwrap_or_else(|| DEFAULT_FRED_BASE_URL.to_string()),
        })
    };

    Ok(SnapshotConfig {
        source_url,
        out_path,
        limit,
        timeout: Duration::from_secs(timeout_secs),
        oil,
    })
}

fn resolve_limit(flag: Option<usize>, env: impl Fn(&str) -> Option<String>) -> Result<usize, AppError> {
    let limit = match flag {
        Some(n) => n,
        None => parse_env_number(&env, ENV_LIMIT)?.unwrap_or(DEFAULT_LIMIT),
    };
    if limit == 0 {
        return Err(AppError::new(2, "Series limit must be > 0."));
    }
    Ok(limit)
}

fn parse_env_number<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AppError> {
    match env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::new(2, format!("Invalid {key} value '{raw}': expected a positive integer."))),
    }
}

/// Insert the implicit `run` subcommand.
///
/// Nothing, or a leading flag other than help/version, means `run`.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let insert_run = match argv.get(1).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version" | "help" | "run" | "parse" | "show") => false,
        Some(first) => first.starts_with('-'),
    };
    if insert_run {
        argv.insert(1.min(argv.len()), "run".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["indicadores"])), argv(&["indicadores", "run"]));
        assert_eq!(
            rewrite_args(argv(&["indicadores", "--no-oil"])),
            argv(&["indicadores", "run", "--no-oil"])
        );
        assert_eq!(
            rewrite_args(argv(&["indicadores", "show"])),
            argv(&["indicadores", "show"])
        );
        assert_eq!(
            rewrite_args(argv(&["indicadores", "--help"])),
            argv(&["indicadores", "--help"])
        );
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["indicadores", "-n", "3", "--no-oil"])));
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.limit, Some(3));
                assert!(args.no_oil);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn defaults_without_env() {
        let config = snapshot_config_from_args(&RunArgs::default(), env_from(&[])).unwrap();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.out_path, PathBuf::from(DEFAULT_OUT));
        assert_eq!(config.limit, 5);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.oil.is_none());
    }

    #[test]
    fn env_then_flags_override() {
        let env = env_from(&[
            (ENV_SOURCE_URL, "https://mirror.test/feed.json"),
            (ENV_LIMIT, "7"),
            (ENV_FRED_API_KEY, "k"),
            (ENV_OIL_SERIES, "DCOILBRENTEU"),
        ]);
        let config = snapshot_config_from_args(&RunArgs::default(), &env).unwrap();
        assert_eq!(config.source_url, "https://mirror.test/feed.json");
        assert_eq!(config.limit, 7);
        let oil = config.oil.unwrap();
        assert_eq!(oil.api_key, "k");
        assert_eq!(oil.series_id, "DCOILBRENTEU");
        assert_eq!(oil.base_url, DEFAULT_FRED_BASE_URL);

        let mirrored = env_from(&[(ENV_FRED_API_KEY, "k"), (ENV_FRED_BASE_URL, "http://fred.mirror.test/obs")]);
        let config = snapshot_config_from_args(&RunArgs::default(), &mirrored).unwrap();
        assert_eq!(config.oil.unwrap().base_url, "http://fred.mirror.test/obs");

        let args = RunArgs {
            limit: Some(2),
            no_oil: true,
            ..RunArgs::default()
        };
        let config = snapshot_config_from_args(&args, &env).unwrap();
        assert_eq!(config.limit, 2);
        assert!(config.oil.is_none());
    }

    #[test]
    fn invalid_env_numbers_are_config_errors() {
        let err = snapshot_config_from_args(&RunArgs::default(), env_from(&[(ENV_LIMIT, "five")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains(ENV_LIMIT));

        let err = snapshot_config_from_args(&RunArgs::default(), env_from(&[(ENV_TIMEOUT, "0")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
