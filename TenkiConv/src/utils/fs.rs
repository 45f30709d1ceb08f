//! File system helpers for all-or-nothing output

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

/// Replace `path` with `data` atomically
///
/// The data goes to a temp file in the same directory, which is then renamed
/// over the target. Readers see either the old or the new content, never a
/// partial write. An existing target keeps its permissions.
///
/// # Errors
/// Returns an error if the temp file cannot be created, written, or renamed.
pub fn write_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    if path.exists() {
        let permissions = std::fs::metadata(path)?.permissions();
        temp.as_file().set_permissions(permissions)?;
    }
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy an existing file to `<path>.bak`
///
/// Returns the backup path, or `None` when there was nothing to back up.
///
/// # Errors
/// Returns an error if the copy fails.
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    let backup = PathBuf::from(name);
    std::fs::copy(path, &backup)?;
    tracing::debug!("Backed up {:?} to {:?}", path, backup);
    Ok(Some(backup))
}
