//! Promoting a remuxed file over its original.
//!
//! The original is renamed to a backup name in the same directory, then the
//! remuxed output takes the original's name. The backup is never deleted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default prefix for the backup copy of an original file.
pub const DEFAULT_BACKUP_PREFIX: &str = "old";

/// Default suffix appended to the original path for the remux output.
pub const DEFAULT_TEMP_SUFFIX: &str = ".temp";

/// Naming rules for the files a commit touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitNames {
    pub backup_prefix: String,
    pub temp_suffix: String,
}

impl Default for CommitNames {
    fn default() -> Self {
        Self {
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
        }
    }
}

impl CommitNames {
    /// `<dir>/<prefix><name>`, next to the original.
    pub fn backup_path(&self, source: &Path) -> Option<PathBuf> {
        let name = source.file_name()?;
        let mut backup = OsString::from(&self.backup_prefix);
        backup.push(name);
        Some(source.with_file_name(backup))
    }

    /// `<source><suffix>`, next to the original so the final rename stays on
    /// one filesystem.
    pub fn temp_path(&self, source: &Path) -> PathBuf {
        let mut temp = source.as_os_str().to_os_string();
        temp.push(&self.temp_suffix);
        PathBuf::from(temp)
    }
}

/// Paths after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// The original path, now holding the remuxed content.
    pub path: PathBuf,
    /// Where the original content now lives.
    pub backup: PathBuf,
}

/// Replace `source` with `temp`, keeping the original as a backup.
///
/// Either both renames happen, or the directory is left as it was found
/// (apart from `temp` being discarded when nothing was renamed yet).
///
/// # Errors
///
/// Returns [`Error::CommitFailure`] if `temp` is missing, the backup name is
/// taken, or a rename fails. If the second rename fails the first is rolled
/// back and `temp` is left in place; a failed rollback is reported in the
/// message with both paths.
pub fn commit(source: &Path, temp: &Path, names: &CommitNames) -> Result<Committed> {
    let file = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    if !temp.exists() {
        return Err(Error::commit_failure(
            &file,
            format!("remuxed output does not exist: {}", temp.display()),
        ));
    }

    let backup = names.backup_path(source).ok_or_else(|| {
        Error::commit_failure(&file, format!("invalid source path: {}", source.display()))
    })?;

    if backup.exists() {
        discard_temp(temp, &file);
        return Err(Error::commit_failure(
            &file,
            format!(
                "backup {} already exists; refusing to overwrite it",
                backup.display()
            ),
        ));
    }

    tracing::debug!(file = %file, backup = %backup.display(), "moving original aside");
    if let Err(e) = std::fs::rename(source, &backup) {
        discard_temp(temp, &file);
        return Err(Error::commit_failure(
            &file,
            format!("failed to move original to {}: {e}", backup.display()),
        ));
    }

    if let Err(e) = std::fs::rename(temp, source) {
        return match std::fs::rename(&backup, source) {
            Ok(()) => Err(Error::commit_failure(
                &file,
                format!("failed to move remuxed output into place ({e}); original restored"),
            )),
            Err(restore) => Err(Error::commit_failure(
                &file,
                format!(
                    "failed to move remuxed output into place ({e}) and to restore the original \
                     ({restore}); original content is at {}, remuxed output at {}",
                    backup.display(),
                    temp.display()
                ),
            )),
        };
    }

    tracing::info!(file = %file, backup = %backup.display(), "committed");
    Ok(Committed {
        path: source.to_path_buf(),
        backup,
    })
}

fn discard_temp(temp: &Path, file: &str) {
    if let Err(e) = std::fs::remove_file(temp) {
        tracing::warn!(file, path = %temp.display(), "could not remove remuxed output: {e}");
    }
}
