//! Command-line options and logging setup for the binary. The terminal UI owns
//! stdout, so tracing output is always written to a file.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Name used for the data directory and the default log file.
const APP_NAME: &str = "customer-manager";
const LOG_FILE_NAME: &str = "customer-manager.log";

#[derive(Parser, Debug)]
#[command(name = "customer-manager")]
#[command(about = "Keep a list of customers in a terminal form", long_about = None)]
pub struct Cli {
    /// Start with a few sample customers already in the list
    #[arg(long)]
    pub demo: bool,

    /// Where to write log output (defaults to the user's local data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `customer_manager=trace`.
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// The log file path, falling back to the per-user data directory.
    pub fn resolve_log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

fn default_log_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow!("could not locate a data directory"))?;
    Ok(dirs.data_local_dir().join(LOG_FILE_NAME))
}

/// Install the global tracing subscriber, appending to the configured file.
pub fn init_logging(cli: &Cli) -> Result<PathBuf> {
    let path = cli.resolve_log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(path)
}
