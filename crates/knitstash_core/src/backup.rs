//! Timestamped backup of the stash file.
//!
//! The original file is renamed out of the way before anything is
//! parsed or mutated, so a failed run can never destroy data: the
//! backup stays behind as a permanent byproduct and the original path
//! is only recreated by a successful write-back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::{MigrateError, MigrateResult};

/// Timestamp format used in backup filenames, second resolution.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Renames `path` to `<path>.original.<timestamp>` and returns the
/// backup path.
///
/// Fails with [`MigrateError::FileNotFound`] when the source file does
/// not exist, [`MigrateError::Io`] on any other rename failure.
pub fn create_backup(path: &Path) -> MigrateResult<PathBuf> {
    let backup_path = backup_path_for(path, &Local::now().format(TIMESTAMP_FORMAT).to_string());

    match fs::rename(path, &backup_path) {
        Ok(()) => {
            info!("backup created: {}", backup_path.display());
            Ok(backup_path)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MigrateError::file_not_found(path)),
        Err(e) => Err(MigrateError::Io(e)),
    }
}

fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".original.{timestamp}"));
    PathBuf::from(name)
}
