//! Timestamped backup tree for files that are about to be overwritten.

use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

/// Name prefix of every backup directory; directories with it are never walked.
pub const BACKUP_DIR_PREFIX: &str = "bootstrap_update_backup_";

/// Backup directory name for a run that started at `started_at`.
#[must_use]
pub fn backup_dir_name(started_at: &DateTime<Local>) -> String {
    format!("{BACKUP_DIR_PREFIX}{}", started_at.format("%Y%m%d_%H%M%S"))
}

/// Default backup location: a timestamped sibling of `root`.
#[must_use]
pub fn default_backup_root(root: &Path, started_at: &DateTime<Local>) -> PathBuf {
    let parent = root
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parent.join(backup_dir_name(started_at))
}

/// Copies originals into `destination`, mirroring their path relative to `source_root`.
///
/// Nothing is created on disk until the first [`Backup::store`].
#[derive(Debug, Clone)]
pub struct Backup {
    source_root: PathBuf,
    destination: PathBuf,
}

impl Backup {
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination: destination.into(),
        }
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Where the copy of `file` goes.
    #[must_use]
    pub fn destination_for(&self, file: &Path) -> PathBuf {
        let relative = match file.strip_prefix(&self.source_root) {
            Ok(rel) => rel,
            // Never join an absolute path: it would replace the destination.
            Err(_) => file
                .file_name()
                .map_or_else(|| Path::new("unnamed"), Path::new),
        };
        self.destination.join(relative)
    }

    /// Copy `file` into the backup tree, keeping its permissions and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created or the copy fails.
    pub fn store(&self, file: &Path) -> io::Result<PathBuf> {
        let dest = self.destination_for(file);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(file, &dest)?;
        // Timestamps are best effort: a read-only original yields a read-only copy.
        if let Err(e) = copy_times(file, &dest) {
            debug!(file = %dest.display(), "Could not preserve timestamps: {e}");
        }
        Ok(dest)
    }
}

fn copy_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    fs::File::options().write(true).open(to)?.set_times(times)
}
