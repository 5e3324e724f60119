//! Configuration types for a rewrite run.
//!
//! Split into source config (how files are discovered on disk) and the
//! per-variant configs for the mutating `apply` run and the read-only preview.

use std::path::PathBuf;

/// Directory walked when no root is given.
pub const DEFAULT_ROOT: &str = "html";

/// File name suffixes rewritten by an apply run. Matching is case-sensitive.
pub const APPLY_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".php", ".tpl", ".dna", ".inc", ".css", ".js", ".txt", ".TXT",
];

/// File name suffixes sampled by a preview run.
pub const PREVIEW_EXTENSIONS: &[&str] = &[".html", ".tpl", ".php"];

/// Literal substrings a file must contain to be picked as a preview sample.
pub const PREVIEW_NEEDLES: &[&str] = &[
    "bootstrap.min.css",
    "bootstrap.css",
    "bootstrap.min.js",
    "bootstrap.js",
];

/// Number of files a preview run samples.
pub const PREVIEW_SAMPLE_LIMIT: usize = 5;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Filesystem-specific source options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Directory to walk recursively. Must exist.
    pub root: PathBuf,
    /// File name suffixes (including the dot) that select a file.
    pub extensions: Vec<String>,
    /// Exclude patterns (glob format), matched against the full path and the file name.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extensions: owned(APPLY_EXTENSIONS),
            exclude: Vec::new(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}

/// Options for the mutating run.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ApplyConfig {
    pub source: FsSourceConfig,
    /// Where original files are copied before being overwritten.
    /// `None` places a timestamped directory next to the root.
    pub backup_dir: Option<PathBuf>,
    /// Compute the report without backing up or writing anything.
    pub dry_run: bool,
}

/// Options for the read-only preview run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PreviewConfig {
    pub source: FsSourceConfig,
    /// A file is sampled only if its content contains one of these.
    pub needles: Vec<String>,
    /// Stop sampling once this many files were picked.
    pub limit: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let mut source = FsSourceConfig::default();
        source.extensions = owned(PREVIEW_EXTENSIONS);
        Self {
            source,
            needles: owned(PREVIEW_NEEDLES),
            limit: PREVIEW_SAMPLE_LIMIT,
        }
    }
}
