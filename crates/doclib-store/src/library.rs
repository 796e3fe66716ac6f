//! Directory enumeration for document and template files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::StoreError;

/// Whether `name` ends with `.<extension>`.
pub(crate) fn has_extension(name: &str, extension: &str, case_sensitive: bool) -> bool {
    let suffix = format!(".{extension}");
    if case_sensitive {
        name.ends_with(&suffix)
    } else {
        name.to_ascii_lowercase()
            .ends_with(&suffix.to_ascii_lowercase())
    }
}

/// Files in `dir` whose extension matches `extension` case-insensitively,
/// sorted by filename. Subdirectories are not descended into.
pub fn list_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(StoreError::io(dir))? {
        let entry = entry.map_err(StoreError::io(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if has_extension(&name.to_string_lossy(), extension, false) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Names of entries in `dir` ending in `.<extension>` (case-sensitive).
///
/// An absent directory yields an empty set, so every template reference
/// checked against it reads as missing.
pub fn list_templates(dir: &Path, extension: &str) -> Result<BTreeSet<String>, StoreError> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "template directory not found, treating as empty");
        return Ok(BTreeSet::new());
    }
    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(StoreError::io(dir))? {
        let entry = entry.map_err(StoreError::io(dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if has_extension(&name, extension, true) {
            names.insert(name);
        }
    }
    Ok(names)
}

/// Number of entries directly inside `dir`.
pub fn count_entries(dir: &Path) -> Result<usize, StoreError> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir).map_err(StoreError::io(dir))? {
        entry.map_err(StoreError::io(dir))?;
        count += 1;
    }
    Ok(count)
}
