//! Command line and config resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;

use multibox_core::NumberBoxConfig;

use crate::util::LOG_FILE_NAME;

#[derive(Debug, Parser)]
#[command(name = "multibox-bridge", version, about = "Edit an X, Y, Z triple in the terminal")]
pub struct Cli {
    /// Config file (JSON). Defaults to config.json in the platform config dir.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Step size for one arrow press or wheel notch
    #[arg(long)]
    pub tick: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Jump to the opposite bound instead of clamping
    #[arg(long)]
    pub wrap: bool,

    /// Auto-repeat cadence in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Where tracing output goes. Defaults to the platform data dir.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// File config (if any), then command line overrides, then validation.
    pub fn resolve_config(&self) -> Result<NumberBoxConfig> {
        let mut config = match self.config_path() {
            Some(path) => NumberBoxConfig::load(&path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => NumberBoxConfig::default(),
        };

        if let Some(tick) = self.tick {
            config.tick_frequency = tick;
        }
        if let Some(min) = self.min {
            config.minimum = min;
        }
        if let Some(max) = self.max {
            config.maximum = max;
        }
        if self.wrap {
            config.wrap = true;
        }
        if let Some(ms) = self.interval_ms {
            config.repeat_interval_ms = ms;
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }

    /// An explicit `--config` always wins, even if missing (that is an error).
    /// The default location is only used when the file exists.
    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        default_config_path().filter(|path| path.is_file())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "multibox").map(|dirs| dirs.config_dir().join("config.json"))
}

pub fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "multibox")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}
