use std::path::{Path, PathBuf};

use cashflow_core::RecentFiles;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CashflowConfig {
    #[serde(default)]
    pub cashflow: CashflowSection,
    #[serde(default)]
    pub recent: RecentFiles,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CashflowSection {
    /// Budget file used when `--file` is not given.
    pub path: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CashflowConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config if it exists, otherwise start from defaults.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<CashflowConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(CashflowConfig::default())
    }
}

pub fn write_config(path: &Path, config: &CashflowConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("cashflow"));
        }
    }
    Ok(home_dir()?.join(".config").join("cashflow"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = CashflowConfig::default();
        config.cashflow.path = Some("/tmp/home.cashflow".to_string());
        config.recent.add("/tmp/home.cashflow");

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.cashflow.path.as_deref(), Some("/tmp/home.cashflow"));
        assert_eq!(loaded.recent, config.recent);
    }

    #[test]
    fn test_missing_sections_default() {
        let config: CashflowConfig = toml::from_str("").unwrap();
        assert!(config.cashflow.path.is_none());
        assert!(config.recent.files().is_empty());
        assert_eq!(config.recent.limit(), cashflow_core::recent::DEFAULT_LIMIT);
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(config.cashflow.path.is_none());
    }
}
