//! Layered configuration: defaults, YAML file, environment, command line

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::constants::{
    API_BASE_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS, LOG_FILE_NAME,
};

/// Command-line flags
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "catalog-tui", version, about = "Terminal catalog manager for a REST product API")]
pub struct Cli {
    /// Base URL of the product API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Directory CSV exports are written to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Request timeout in seconds, 0 to wait indefinitely
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Optional values as they appear in the config file
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub page_size: Option<usize>,
    pub export_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub page_size: usize,
    pub export_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: String::from(DEFAULT_API_BASE),
            page_size: DEFAULT_PAGE_SIZE,
            export_dir: PathBuf::from("."),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: config_dir().join(LOG_FILE_NAME),
        }
    }
}

/// `~/.catalog-tui`, falling back to the working directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let file = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(file)
    }
}

impl Config {
    /// Resolve settings for the given command line
    ///
    /// An explicit `--config` path must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::read(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    ConfigFile::read(&path)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        let env_base = std::env::var(API_BASE_ENV).ok().filter(|s| !s.trim().is_empty());
        Ok(Self::resolve(file, env_base, cli))
    }

    /// Merge layers, later ones winning: defaults, file, environment, flags
    pub fn resolve(file: ConfigFile, env_api_base: Option<String>, cli: &Cli) -> Self {
        let mut config = Config::default();

        if let Some(base) = file.api_base {
            config.api_base = base;
        }
        if let Some(size) = file.page_size {
            config.page_size = size;
        }
        if let Some(dir) = file.export_dir {
            config.export_dir = dir;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(log) = file.log_file {
            config.log_file = log;
        }

        if let Some(base) = env_api_base {
            config.api_base = base;
        }

        if let Some(base) = &cli.api_base {
            config.api_base = base.clone();
        }
        if let Some(size) = cli.page_size {
            config.page_size = size;
        }
        if let Some(dir) = &cli.export_dir {
            config.export_dir = dir.clone();
        }
        if let Some(secs) = cli.timeout {
            config.request_timeout_secs = secs;
        }

        config.api_base = config.api_base.trim().trim_end_matches('/').to_string();
        config.page_size = config.page_size.max(1);
        config
    }
}
