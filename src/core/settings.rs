//! Run configuration and persisted tool settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, LoaderResult};

/// Where to read from and write to for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory holding `input/` and `output/`
    pub base_path: PathBuf,
    /// Mounted card to mirror the output onto, if any
    pub card_path: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn new(base_path: &Path, card_path: Option<PathBuf>) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            card_path,
        }
    }

    pub fn input_root(&self) -> PathBuf {
        self.base_path.join("input")
    }

    pub fn output_root(&self) -> PathBuf {
        self.base_path.join("output")
    }
}

fn default_transcoder() -> String {
    "sox".to_string()
}

fn default_log_to_file() -> bool {
    true
}

/// Optional settings read from `<base>/loader.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Program name looked up on PATH, or a path to the binary
    #[serde(default = "default_transcoder")]
    pub transcoder: String,
    /// Whether to also write a log file under the user's data directory
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            transcoder: default_transcoder(),
            log_to_file: default_log_to_file(),
        }
    }
}

impl LoaderSettings {
    pub const SETTINGS_FILE: &'static str = "loader.json";

    /// Load settings from the base directory, or defaults if the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is an error rather
    /// than a silent fallback.
    pub fn load(base_path: &Path) -> LoaderResult<Self> {
        let settings_path = base_path.join(Self::SETTINGS_FILE);

        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
            LoaderError::Configuration(format!(
                "failed to read settings {}: {}",
                settings_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            LoaderError::Configuration(format!(
                "failed to parse settings {}: {}",
                settings_path.display(),
                e
            ))
        })
    }
}
