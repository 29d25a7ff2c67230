//! Discovery of container files in the input directory.

use mkvstrip_av::{Error, Result};
use std::path::{Path, PathBuf};

/// List regular files in `dir` (no recursion) whose extension matches
/// `extension`, ignoring ASCII case and a leading dot. Sorted by file name.
///
/// # Errors
///
/// Returns [`Error::ListingFailure`] if the directory cannot be read.
/// Individual unreadable entries are logged and skipped.
pub fn list_media_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let listing_failure = |source| Error::ListingFailure {
        path: dir.to_path_buf(),
        source,
    };

    tracing::info!("Processing {}", dir.display());

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_failure)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!("Found {} candidate files", files.len());
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
