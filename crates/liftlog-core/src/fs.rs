//! Filesystem utilities for atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `bytes` to `destination` through a sibling temp file, so readers
/// never observe a partially written file.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed into place.
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(destination);
    {
        let mut file = fs::File::create(&temp_path)?;
        if let Err(err) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    }
    rename_with_fallback(&temp_path, destination)
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "liftlog".to_string());
    destination.with_file_name(format!(".{}.tmp-{}", name, std::process::id()))
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("report.xlsx");

        write_atomic(&dest, b"test").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"test");
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("report.xlsx");
        fs::write(&dest, b"old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("report.xlsx");
        assert!(write_atomic(&dest, b"x").is_err());
    }
}
