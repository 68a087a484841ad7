use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::copier::CopyOptions;
use crate::core::naming::NamingStrategy;

/// Persisted user defaults, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CopyConfig {
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

impl CopyConfig {
    /// Merge command-line flags over the stored defaults.
    /// Flags win, then the config file, then `.` and `full`.
    pub fn resolve(&self, output: Option<PathBuf>, prefix: Option<String>) -> Result<CopyOptions> {
        let naming = match prefix.or_else(|| self.prefix.clone()) {
            Some(key) => key.parse::<NamingStrategy>()?,
            None => NamingStrategy::default(),
        };
        let output_dir = output
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| CopyOptions::default().output_dir);
        Ok(CopyOptions { output_dir, naming })
    }
}

/// `$DJAY_TOOLS_CONFIG`, else `$XDG_CONFIG_HOME/djay-tools/config.toml`,
/// else `~/.config/djay-tools/config.toml`.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("DJAY_TOOLS_CONFIG") {
        return PathBuf::from(path);
    }
    let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        }
    };
    config_home.join("djay-tools").join("config.toml")
}

pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// A missing or broken config file falls back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
            return Config::default();
        }
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }
    }
}

pub fn save_config(config: &Config) -> Result<PathBuf> {
    let path = config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
