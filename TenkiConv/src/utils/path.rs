//! Path utilities

use std::path::{Path, PathBuf};

/// Lowercased extension of a path, without the dot
pub fn extension_lowercase<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Sibling file sharing the stem of `path`, e.g. `a01.txt` → `a01.meta`
pub fn companion_path<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
    path.as_ref().with_extension(extension)
}
