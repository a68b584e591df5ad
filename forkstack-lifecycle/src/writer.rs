//! Atomic writer for the marker and env files.
//!
//! ## `atomic_write`
//!
//! 1. Normalise line endings to LF.
//! 2. Compare with the file on disk, skip if identical.
//! 3. Write to `<path>.forkstack.tmp` (mode `0600` for private files).
//! 4. Rename to the final path (atomic on POSIX).

use std::path::{Path, PathBuf};

use crate::error::{io_err, LifecycleError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Content changed or the file did not previously exist.
    Written { path: PathBuf },
    /// The file already held exactly this content.
    Unchanged { path: PathBuf },
    /// `--dry-run`: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// Who may read the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Process umask applies.
    Shared,
    /// Owner read/write only; used for files holding credentials.
    Private,
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

pub fn atomic_write(
    path: &Path,
    content: &str,
    mode: FileMode,
    dry_run: bool,
) -> Result<WriteResult, LifecycleError> {
    let tmp = PathBuf::from(format!("{}.forkstack.tmp", path.display()));
    atomic_write_with_tmp(path, content, mode, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    mode: FileMode,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, LifecycleError> {
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    if let Ok(existing) = std::fs::read_to_string(path) {
        if existing == content {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if mode == FileMode::Private {
        if let Err(e) = set_private_permissions(tmp) {
            let _ = std::fs::remove_file(tmp);
            return Err(io_err(tmp, e));
        }
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Remove `path`; `Ok(false)` if it was already gone.
pub fn remove_if_exists(path: &Path) -> Result<bool, LifecycleError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

#[cfg(unix)]
fn set_private_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}
#[cfg(not(unix))]
fn set_private_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) -> WriteResult {
        atomic_write(path, content, FileMode::Shared, false).unwrap()
    }

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".current-env");
        assert!(matches!(write(&path, "alice"), WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "alice");
    }

    #[test]
    fn same_content_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".current-env");
        write(&path, "alice");
        assert!(matches!(write(&path, "alice"), WriteResult::Unchanged { .. }));
        assert!(matches!(write(&path, "bob"), WriteResult::Written { .. }));
    }

    #[test]
    fn dry_run_does_not_write_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env.local");
        let result = atomic_write(&path, "X=1\n", FileMode::Private, true).unwrap();
        assert!(matches!(result, WriteResult::WouldWrite { .. }));
        assert!(!path.exists(), "dry-run must not create files");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env.local");
        write(&path, "data");
        let tmp_path = PathBuf::from(format!("{}.forkstack.tmp", path.display()));
        assert!(!tmp_path.exists(), ".forkstack.tmp must be cleaned up");
    }

    #[test]
    fn crlf_is_normalised() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env.local");
        write(&path, "A=1\r\nB=2\r\n");
        assert!(matches!(write(&path, "A=1\nB=2\n"), WriteResult::Unchanged { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "A=1\nB=2\n");
    }

    #[test]
    fn remove_reports_absence() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".current-env");
        assert!(!remove_if_exists(&path).unwrap());
        write(&path, "alice");
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    #[cfg(unix)]
    fn private_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env.local");
        atomic_write(&path, "DATABASE_AUTH_TOKEN=t\n", FileMode::Private, false).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();
        let path = readonly_dir.join(".env.local");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join(".env.local.forkstack.tmp");
        let result = atomic_write_with_tmp(&path, "new", FileMode::Shared, false, &tmp_path);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only assert when the rename failed.
        if result.is_err() {
            assert_eq!(fs::read_to_string(&path).unwrap(), "original");
            assert!(!tmp_path.exists(), ".forkstack.tmp should be cleaned up");
        }
    }
}
