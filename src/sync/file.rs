//! Atomic file operations.
//!
//! Files that matter (project stores, rendered documents) are never
//! written in place: content goes to a sibling temp file, is synced to
//! disk, and is then renamed over the target.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sibling temp path: same directory, `.tmp` appended to the file name.
#[must_use]
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("file"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if let Err(e) = write_synced(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    commit_temp(&temp_path, path)
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content)?;
    writer.flush()?;
    // Sync to disk before rename
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Sync an already-written temp file and rename it over `path`.
///
/// # Errors
///
/// Returns an error if the sync or rename fails. The temp file is
/// removed on failure.
pub fn commit_temp(temp_path: &Path, path: &Path) -> Result<()> {
    let result = File::open(temp_path)
        .and_then(|f| f.sync_all())
        .and_then(|()| fs::rename(temp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(temp_path);
        return Err(e.into());
    }

    sync_parent_dir(path);
    Ok(())
}

/// Best-effort fsync of the directory entry after a rename.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
            tracing::debug!(dir = %parent.display(), error = %e, "Directory sync failed");
        }
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out.xml");

        atomic_write(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_atomic_write_replaces_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.xml");
        fs::write(&path, b"old").unwrap();

        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_temp_path_for() {
        let p = temp_path_for(Path::new("/a/project-store"));
        assert_eq!(p, PathBuf::from("/a/project-store.tmp"));
    }
}
