use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_BASE_URL;

pub const DEFAULT_CARDS_PER_PAGE: usize = 5;

/// Browse the Rick and Morty character list in your terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// API root, e.g. https://rickandmortyapi.com/api
    #[arg(long)]
    pub base_url: Option<String>,

    /// How many characters to show from each fetched page
    #[arg(long)]
    pub cards_per_page: Option<usize>,

    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub cards_per_page: usize,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cards_per_page: DEFAULT_CARDS_PER_PAGE,
            timeout_secs: None,
            log_file: None,
        }
    }
}

/// ~/.config/schwifty/config.toml (Linux) or the platform equivalent
fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("schwifty").join("config.toml"))
}

impl Config {
    /// Load from `path` (or the default location), falling back to defaults
    /// when the file is missing or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: ignoring invalid config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Apply command-line overrides on top of the file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.base_url {
            self.base_url = url.clone();
        }
        if let Some(n) = cli.cards_per_page {
            self.cards_per_page = n;
        }
        if let Some(file) = &cli.log_file {
            self.log_file = Some(file.clone());
        }
        if self.cards_per_page == 0 {
            self.cards_per_page = DEFAULT_CARDS_PER_PAGE;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
