use mkvstrip_av::commit::{DEFAULT_BACKUP_PREFIX, DEFAULT_TEMP_SUFFIX};
use mkvstrip_av::{CommitNames, IdentifyFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit mkvmerge location; PATH is searched when unset or missing
    #[serde(default)]
    pub mkvmerge_path: Option<PathBuf>,

    /// Upper bound on each mkvmerge run; unset waits forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Identification output to request and parse
    #[serde(default)]
    pub identify_format: IdentifyFormat,

    /// Treat mkvmerge exit status 1 (warnings) as a successful remux
    #[serde(default)]
    pub accept_warnings: bool,
}

impl ToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Container extension to pick up, compared case-insensitively
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Prefix for the backup copy of each original
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,

    /// Suffix for the remux output before it replaces the original
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,
}

fn default_extension() -> String {
    "mkv".to_string()
}
fn default_backup_prefix() -> String {
    DEFAULT_BACKUP_PREFIX.to_string()
}
fn default_temp_suffix() -> String {
    DEFAULT_TEMP_SUFFIX.to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            backup_prefix: default_backup_prefix(),
            temp_suffix: default_temp_suffix(),
        }
    }
}

impl BatchConfig {
    pub fn commit_names(&self) -> CommitNames {
        CommitNames {
            backup_prefix: self.backup_prefix.clone(),
            temp_suffix: self.temp_suffix.clone(),
        }
    }
}
