//! Path resolution for config and budget files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config_or_default, write_config};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Resolve the config file path, checking CASHFLOW_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the budget file from `--file`/CASHFLOW_FILE, then the config.
pub fn resolve_budget_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.file.clone() {
        return Ok(path);
    }

    let config_path = resolve_config_path()?;
    let config = read_config_or_default(&config_path)?;
    match config.cashflow.path {
        Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Err(CliError::not_found(
            "No budget file selected",
            "Run `cashflow new <PATH>` or pass --file <PATH>",
        )
        .into()),
    }
}

/// Error message when the budget file is missing.
pub fn missing_budget_message(path: &Path) -> CliError {
    CliError::not_found(
        format!("No budget found at {}", path.display()),
        format!("Run `cashflow new {}` to create it", path.display()),
    )
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Move `path` to the front of the recent-files list in the config.
pub fn record_recent(path: &Path) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    let mut config = read_config_or_default(&config_path)?;
    config.recent.add(absolute(path));
    write_config(&config_path, &config)
}

/// Make `path` the budget used when `--file` is absent.
///
/// Without `force`, an existing default is kept. Returns whether the
/// default changed.
pub fn set_default_budget(path: &Path, force: bool) -> anyhow::Result<bool> {
    let config_path = resolve_config_path()?;
    let mut config = read_config_or_default(&config_path)?;
    if config.cashflow.path.is_some() && !force {
        return Ok(false);
    }
    config.cashflow.path = Some(absolute(path).to_string_lossy().to_string());
    write_config(&config_path, &config)?;
    Ok(true)
}
