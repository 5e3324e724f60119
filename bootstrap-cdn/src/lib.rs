//! # bootstrap-cdn
//!
//! Rewrites Bootstrap stylesheet and script references in a tree of markup
//! files so they all point at one pinned CDN release with Subresource
//! Integrity hashes.
//!
//! Two runs are provided:
//! - [`apply_fs`] rewrites every matching file in place, copying each
//!   original into a timestamped backup tree first.
//! - [`preview_fs`] samples a few files that mention Bootstrap and reports
//!   what would change, without touching the disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use bootstrap_cdn::{ApplyConfig, CdnTarget, apply_fs};
//!
//! let mut config = ApplyConfig::default();
//! config.source.root = PathBuf::from("site/html");
//!
//! let report = apply_fs(&config, &CdnTarget::BOOTSTRAP_5_3_3)?;
//! println!("Files processed: {}", report.files_processed);
//! println!("Files updated: {}", report.files_updated);
//! println!("Errors: {}", report.errors_count());
//! # Ok::<(), bootstrap_cdn::RewriteError>(())
//! ```

mod backup;
mod config;
mod error;
pub mod output;
mod patterns;
mod report;
mod rewrite;
mod strategy;
mod target;

pub use backup::{BACKUP_DIR_PREFIX, Backup, backup_dir_name, default_backup_root};
pub use config::{
    APPLY_EXTENSIONS, ApplyConfig, DEFAULT_ROOT, FsSourceConfig, PREVIEW_EXTENSIONS,
    PREVIEW_NEEDLES, PREVIEW_SAMPLE_LIMIT, PreviewConfig,
};
pub use error::{RewriteError, ScanError, ScanErrorKind};
pub use patterns::{AssetKind, PatternEntry, PatternKind, full_patterns, tag_patterns};
pub use report::{FilePreview, PreviewReport, RunReport};
pub use rewrite::{ExcerptLine, Profile, Rewrite, Substitution, excerpt, rewrite_content};
pub use target::CdnTarget;

use std::path::Path;

use chrono::Local;
use tracing::{debug, info, warn};

use strategy::fs::{ScanResult, find_files, read_file_bounded, sample_files};

/// An info-level progress event is emitted every this many files.
const PROGRESS_INTERVAL: usize = 100;

/// Context lines shown either side of the first pinned reference in a preview.
const EXCERPT_CONTEXT: usize = 1;

/// Rewrite every matching file under `config.source.root`.
///
/// Each changed file is copied into the backup tree and then overwritten.
/// Files without a reference are neither backed up nor written.
///
/// # Errors
///
/// Returns [`RewriteError::RootMissing`] if the root directory does not exist.
/// Per-file failures (unreadable, not UTF-8, backup or write failed) are
/// collected in `report.errors` and never abort the run.
pub fn apply_fs(config: &ApplyConfig, target: &CdnTarget) -> Result<RunReport, RewriteError> {
    let root = &config.source.root;
    if !root.is_dir() {
        return Err(RewriteError::RootMissing(root.clone()));
    }

    let started_at = Local::now();
    let backup = Backup::new(
        root,
        config
            .backup_dir
            .clone()
            .unwrap_or_else(|| default_backup_root(root, &started_at)),
    );

    let (files, scan_errors) = find_files(&config.source);
    let total = files.len();
    info!("Found {total} files to process");

    let mut report = RunReport {
        errors: scan_errors,
        dry_run: config.dry_run,
        ..RunReport::default()
    };

    for (index, file_path) in files.iter().enumerate() {
        let done = index + 1;
        if done % PROGRESS_INTERVAL == 0 {
            info!("Progress: {done}/{total} files processed...");
        }
        report.files_processed += 1;

        let content = match read_file_bounded(file_path, config.source.max_file_size) {
            ScanResult::Ok(c) => c,
            ScanResult::Err(e) => {
                warn!(file = %file_path.display(), "{}", e.message);
                report.errors.push(e);
                continue;
            }
        };

        let rewrite = rewrite_content(&content, target, Profile::Apply);
        for sub in &rewrite.substitutions {
            debug!(
                file = %file_path.display(),
                kind = sub.kind.label(),
                url = %sub.url,
                "Matched reference"
            );
        }
        report.css_references_updated += rewrite.count(AssetKind::Stylesheet);
        report.js_references_updated += rewrite.count(AssetKind::Script);
        if !rewrite.changed {
            continue;
        }

        if config.dry_run {
            debug!(file = %file_path.display(), "Would update");
            report.files_updated += 1;
            continue;
        }

        if let Err(e) = write_with_backup(file_path, &rewrite.content, &backup) {
            warn!(file = %file_path.display(), "{}", e.message);
            report.errors.push(e);
            continue;
        }
        report.backup_dir = Some(backup.destination().to_path_buf());
        report.files_updated += 1;
        debug!(file = %file_path.display(), substitutions = rewrite.substitutions.len(), "Updated");
    }

    Ok(report)
}

/// Back up `path`, then overwrite it with `content`.
fn write_with_backup(path: &Path, content: &str, backup: &Backup) -> Result<(), ScanError> {
    backup.store(path).map_err(|e| {
        ScanError::new(
            path,
            ScanErrorKind::BackupFailed,
            format!("Error backing up file: {e}"),
        )
    })?;
    std::fs::write(path, content).map_err(|e| {
        ScanError::new(
            path,
            ScanErrorKind::WriteFailed,
            format!("Error writing file: {e}"),
        )
    })
}

/// Show what an apply run would change on a small sample of files.
///
/// # Errors
///
/// Returns [`RewriteError::RootMissing`] if the root directory does not exist,
/// and [`RewriteError::NoCandidates`] if no file mentioning Bootstrap was found.
pub fn preview_fs(
    config: &PreviewConfig,
    target: &CdnTarget,
) -> Result<PreviewReport, RewriteError> {
    let root = &config.source.root;
    if !root.is_dir() {
        return Err(RewriteError::RootMissing(root.clone()));
    }

    let (samples, errors) = sample_files(&config.source, &config.needles, config.limit);
    if samples.is_empty() {
        return Err(RewriteError::NoCandidates(root.clone()));
    }
    info!("Found {} test files", samples.len());

    let files = samples
        .into_iter()
        .map(|sample| {
            let rewrite = rewrite_content(&sample.content, target, Profile::Preview);
            let excerpt = if rewrite.changed {
                excerpt(&rewrite.content, target, EXCERPT_CONTEXT)
            } else {
                Vec::new()
            };
            FilePreview {
                file: sample.path,
                changed: rewrite.changed,
                substitutions: rewrite.substitutions,
                excerpt,
            }
        })
        .collect();

    Ok(PreviewReport { files, errors })
}
