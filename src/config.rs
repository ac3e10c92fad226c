//! Configuration management for Witness.
//!
//! Loads and saves the core's small JSON configuration under the app data
//! directory. Absent file or fields fall back to defaults, so a fresh
//! install needs no setup step.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{WitnessError, WitnessResult};

/// Configuration file name inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// Persisted configuration values
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigData {
    /// Directory where record collections are stored (default: `<data>/records`)
    #[serde(default)]
    pub records_directory: Option<String>,
    /// Directory where recorded audio assets are written (default: `<data>/audio`)
    #[serde(default)]
    pub audiofile_directory: Option<String>,
}

/// Configuration handle bound to a data directory.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    pub data: ConfigData,
}

impl Config {
    /// Load configuration from `<data_dir>/config.json`, creating the data
    /// directory if needed. A missing file yields defaults.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> WitnessResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .map_err(|err| WitnessError::Config(format!("cannot create data dir: {}", err)))?;

        let path = data_dir.join(CONFIG_FILE);
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|err| WitnessError::Config(format!("cannot read config: {}", err)))?;
            serde_json::from_str(&raw)
                .map_err(|err| WitnessError::Config(format!("cannot parse config: {}", err)))?
        } else {
            ConfigData::default()
        };

        Ok(Self { data_dir, data })
    }

    /// Write the configuration back to disk
    pub fn save(&self) -> WitnessResult<()> {
        let raw = serde_json::to_string_pretty(&self.data)?;
        fs::write(self.data_dir.join(CONFIG_FILE), raw)
            .map_err(|err| WitnessError::Config(format!("cannot write config: {}", err)))?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory backing the key-value record store
    pub fn records_directory(&self) -> PathBuf {
        match &self.data.records_directory {
            Some(dir) => PathBuf::from(dir),
            None => self.data_dir.join("records"),
        }
    }

    /// Directory the capture engine writes audio assets into
    pub fn audiofile_directory(&self) -> PathBuf {
        match &self.data.audiofile_directory {
            Some(dir) => PathBuf::from(dir),
            None => self.data_dir.join("audio"),
        }
    }
}
