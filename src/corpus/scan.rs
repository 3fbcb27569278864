use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
}

/// Recursively collect files under `root` with the given extension
/// (without the dot), sorted by path
pub fn check_and_rglob(root: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| ScanError::Walk(root.to_path_buf(), e))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(extension)
        {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!(
        "Found {} *.{} files under {}",
        files.len(),
        extension,
        root.display()
    );

    Ok(files)
}
