use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::DEFAULT_MONTH_LIMIT;
use crate::models::MAX_NOTE_CHARS;
use crate::persistence::FileStorage;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory for `FileStorage`; `None` keeps data in memory only
    pub dir: Option<PathBuf>,
    pub transactions_key: String,
    /// Key of the expense-only collection written by older versions
    pub legacy_key: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            dir: None,
            transactions_key: "transactions-storage".to_string(),
            legacy_key: "expenses-storage".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_note_chars: usize,
    pub monthly_buckets: usize,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_note_chars: MAX_NOTE_CHARS,
            monthly_buckets: DEFAULT_MONTH_LIMIT,
        }
    }
}

impl TrackerConfig {
    /// File storage rooted at the configured directory, if any
    pub fn file_storage(&self) -> Option<FileStorage> {
        self.storage.dir.clone().map(FileStorage::new)
    }
}

/// Load the config at `path`, or the defaults when the file does not exist
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &TrackerConfig) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
