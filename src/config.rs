use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store::DEFAULT_RESET_WINDOW_DAYS;

pub const DATA_DIR_VAR: &str = "NUTRITION_DATA_DIR";
pub const CATALOG_PATH_VAR: &str = "NUTRITION_CATALOG_PATH";
pub const RESET_WINDOW_VAR: &str = "NUTRITION_RESET_WINDOW_DAYS";

const DEFAULT_DATA_DIR: &str = "./nutrition-data";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one JSON file per record.
    pub data_dir: PathBuf,
    /// Replaces the compiled-in food catalog when set.
    pub catalog_path: Option<PathBuf>,
    /// Days of logs, ending today, removed by a full reset.
    pub reset_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
            reset_window_days: DEFAULT_RESET_WINDOW_DAYS,
        }
    }
}

impl Config {
    /// Read configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let catalog_path = lookup(CATALOG_PATH_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let reset_window_days = match lookup(RESET_WINDOW_VAR) {
            Some(raw) if !raw.is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of days", RESET_WINDOW_VAR))?,
            _ => defaults.reset_window_days,
        };

        Ok(Self {
            data_dir,
            catalog_path,
            reset_window_days,
        })
    }
}
