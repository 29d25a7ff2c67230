mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./mkvstrip.toml",
        "~/.config/mkvstrip/config.toml",
        "/etc/mkvstrip/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.tools.timeout_secs == Some(0) {
        anyhow::bail!("tools.timeout_secs must be greater than 0 (omit it to wait indefinitely)");
    }

    if let Some(ref path) = config.tools.mkvmerge_path {
        if !path.exists() {
            tracing::warn!("Configured mkvmerge path does not exist: {:?}", path);
        }
    }

    let extension = config.batch.extension.trim_start_matches('.');
    if extension.is_empty() {
        anyhow::bail!("batch.extension cannot be empty");
    }

    if config.batch.backup_prefix.is_empty() {
        anyhow::bail!("batch.backup_prefix cannot be empty; the original would be overwritten");
    }

    if config.batch.temp_suffix.is_empty() {
        anyhow::bail!("batch.temp_suffix cannot be empty");
    }

    if config.batch.backup_prefix.contains(['/', '\\']) {
        anyhow::bail!("batch.backup_prefix must not contain path separators");
    }

    if config.batch.temp_suffix.contains(['/', '\\']) {
        anyhow::bail!("batch.temp_suffix must not contain path separators");
    }

    Ok(())
}
