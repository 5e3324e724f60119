//! Report types for apply and preview runs.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ScanError;
use crate::rewrite::{ExcerptLine, Substitution};

/// Statistics of an apply run.
///
/// Per-file failures land in `errors`; a non-empty list means some files
/// were left as they were.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct RunReport {
    /// Number of files selected and attempted.
    pub files_processed: usize,
    /// Number of files whose content changed (written back unless `dry_run`).
    pub files_updated: usize,
    /// Stylesheet references rewritten.
    ///
    /// Matches that were already in pinned form are not counted, so a tag
    /// seen by both a local and a CDN matcher counts once.
    pub css_references_updated: usize,
    /// Script references rewritten. Already pinned tags are not counted.
    pub js_references_updated: usize,
    /// Files that could not be read, backed up or written.
    pub errors: Vec<ScanError>,
    /// Backup directory, if any original was copied there.
    pub backup_dir: Option<PathBuf>,
    /// Nothing was written.
    pub dry_run: bool,
}

impl RunReport {
    /// Number of per-file errors.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.errors.len()
    }
}

/// Would-be changes for one sampled file.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct FilePreview {
    pub file: PathBuf,
    pub changed: bool,
    pub substitutions: Vec<Substitution>,
    /// Rewritten lines around the first pinned reference.
    pub excerpt: Vec<ExcerptLine>,
}

/// Result of a preview run. Nothing on disk is modified.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct PreviewReport {
    pub files: Vec<FilePreview>,
    pub errors: Vec<ScanError>,
}

impl PreviewReport {
    /// Number of sampled files that would change.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }
}
