//! Path resolution helpers
//!
//! The watch root must exist and is normalized to an absolute, canonical path
//! so that event paths reported by the backend line up with it. The output
//! directory may not exist yet and is only made absolute.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{RegenError, RegenResult};

/// Canonicalize an input directory, rejecting missing paths and files
pub fn resolve_input_root(path: &Path) -> RegenResult<PathBuf> {
    let canonical = std::fs::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RegenError::DirectoryNotFound {
            path: path.to_path_buf(),
        },
        _ => RegenError::Io(e),
    })?;

    if !canonical.is_dir() {
        return Err(RegenError::NotADirectory { path: canonical });
    }
    Ok(canonical)
}

/// Make a path absolute against the current directory without touching disk
pub fn absolutize(path: &Path) -> RegenResult<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// rest, so a directory that does not exist yet still lines up with the
/// canonical paths the watcher reports
pub fn canonicalize_lenient(path: &Path) -> RegenResult<PathBuf> {
    let absolute = absolutize(path)?;
    let mut missing = Vec::new();
    let mut current = absolute.as_path();
    loop {
        if let Ok(mut base) = std::fs::canonicalize(current) {
            base.extend(missing.iter().rev());
            return Ok(base);
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return Ok(absolute),
        }
    }
}
