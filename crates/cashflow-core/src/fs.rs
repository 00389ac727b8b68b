//! Filesystem utilities for replacing budget files without losing them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CashflowError, Result};

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Path of the fail-safe copy kept while `destination` is being replaced.
pub fn failsafe_path(destination: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut name = destination.as_os_str().to_os_string();
    name.push(format!(".{}", millis));
    PathBuf::from(name)
}

fn temp_sibling(destination: &Path) -> PathBuf {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cashflow".to_string());
    destination.with_file_name(format!(".{}.tmp.{}", file_name, nanos))
}

/// Replace `destination` with a copy of `source`.
///
/// An existing destination is first copied to a timestamped fail-safe
/// (`<destination>.<millis>`). The new content is copied to a temp file next
/// to the destination and renamed over it; the fail-safe is removed last.
///
/// # Errors
///
/// Returns `CashflowError::FileIo` if any step fails. The destination is then
/// restored from the fail-safe, and the fail-safe stays on disk either way.
pub fn replace_with_failsafe(source: &Path, destination: &Path) -> Result<()> {
    let failsafe = if destination.exists() {
        let failsafe = failsafe_path(destination);
        fs::copy(destination, &failsafe).map_err(|e| {
            CashflowError::FileIo(format!(
                "Cannot create fail-safe copy of {}: {}",
                destination.display(),
                e
            ))
        })?;
        debug!(failsafe = %failsafe.display(), "fail-safe copy created");
        Some(failsafe)
    } else {
        None
    };

    let temp = temp_sibling(destination);
    let replaced = fs::copy(source, &temp)
        .and_then(|_| rename_with_fallback(&temp, destination));

    match replaced {
        Ok(()) => {
            if let Some(failsafe) = failsafe {
                if let Err(e) = fs::remove_file(&failsafe) {
                    warn!(failsafe = %failsafe.display(), "cannot remove fail-safe copy: {}", e);
                }
            }
            Ok(())
        }
        Err(copy_err) => {
            let _ = fs::remove_file(&temp);
            if let Some(failsafe) = failsafe {
                restore(&failsafe, destination);
            }
            Err(CashflowError::FileIo(format!(
                "Cannot write {}: {}",
                destination.display(),
                copy_err
            )))
        }
    }
}

fn restore(failsafe: &Path, destination: &Path) {
    match fs::copy(failsafe, destination) {
        Ok(_) => warn!(
            destination = %destination.display(),
            failsafe = %failsafe.display(),
            "write failed, previous file restored and fail-safe kept"
        ),
        Err(e) => warn!(
            failsafe = %failsafe.display(),
            "write failed and restore failed, previous file kept at fail-safe path: {}",
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&temp).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_replace_creates_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("work.db");
        let dest = dir.path().join("budget.cashflow");
        fs::write(&source, b"new").unwrap();

        replace_with_failsafe(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert!(source.exists());
    }

    #[test]
    fn test_replace_removes_failsafe_on_success() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("work.db");
        let dest = dir.path().join("budget.cashflow");
        fs::write(&source, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        replace_with_failsafe(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 2);
    }

    #[test]
    fn test_failed_copy_leaves_destination_intact() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.db");
        let dest = dir.path().join("budget.cashflow");
        fs::write(&dest, b"precious").unwrap();

        let result = replace_with_failsafe(&missing, &dest);

        assert!(matches!(result, Err(CashflowError::FileIo(_))));
        assert_eq!(fs::read(&dest).unwrap(), b"precious");

        let prefix = "budget.cashflow.";
        let failsafes: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(prefix))
                    .map_or(false, |millis| millis.parse::<i64>().is_ok())
            })
            .collect();
        assert_eq!(failsafes.len(), 1);
        assert_eq!(fs::read(&failsafes[0]).unwrap(), b"precious");
    }

    #[test]
    fn test_failsafe_name_extends_destination() {
        let path = failsafe_path(Path::new("/tmp/budget.cashflow"));
        let name = path.to_string_lossy();
        assert!(name.starts_with("/tmp/budget.cashflow."));
    }
}
