use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::sequencer::DEFAULT_STORAGE_KEY;

pub const CONFIG_ENV_VAR: &str = "GRIDTONE_CONFIG";
pub const CONFIG_FILE_NAME: &str = "gridtone.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub storage_key: String,
    pub log_filter: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".gridtone"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_filter: "info".to_string(),
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl Config {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// `$GRIDTONE_CONFIG`, else `./gridtone.ron`, else defaults. A file that
    /// exists but fails to parse is an error.
    pub fn discover() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
