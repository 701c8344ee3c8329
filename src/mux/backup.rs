//! Timestamped backups taken before a file is rewritten

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Timestamp format used in backup names
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// `<stem>.asof_<timestamp>.<ext>`, next to the original
pub fn backup_path(path: &Path, at: &NaiveDateTime) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}.asof_{}", stem, at.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Copy `path` to its backup location and return that location.
///
/// Refuses to overwrite an existing backup.
pub fn create_backup(path: &Path, at: &NaiveDateTime) -> io::Result<PathBuf> {
    let backup = backup_path(path, at);
    if backup.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("backup {} already exists", backup.display()),
        ));
    }
    fs::copy(path, &backup)?;
    tracing::debug!("Backed up {:?} to {:?}", path, backup);
    Ok(backup)
}
