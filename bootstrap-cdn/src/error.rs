//! Error types for rewrite runs.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A failure that stops a run before any file is touched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RewriteError {
    /// The directory to walk does not exist.
    #[error("{} does not exist", .0.display())]
    RootMissing(PathBuf),
    /// A preview found no file that mentions a Bootstrap asset.
    #[error("No files with Bootstrap references found under {}", .0.display())]
    NoCandidates(PathBuf),
}

/// The kind of per-file failure recorded during a run.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while reading the file.
    IoError,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
    /// The file content is not valid UTF-8.
    InvalidEncoding,
    /// A directory traversal error (permission denied, loop detected, etc.).
    WalkError,
    /// An exclude glob pattern could not be parsed.
    InvalidExcludePattern,
    /// The original could not be copied into the backup tree.
    BackupFailed,
    /// The rewritten content could not be written back.
    WriteFailed,
}

/// A file that was skipped because something went wrong with it.
///
/// These never abort a run; they are collected into the report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The file (or directory, or exclude pattern) the error refers to.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    /// Create a new per-file error.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, kind: ScanErrorKind, message: String) -> Self {
        Self {
            file: file.into(),
            kind,
            message,
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: {}", self.file.display(), self.message)
    }
}
