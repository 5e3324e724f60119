//! Filesystem source.
//!
//! Discovers files on disk and reads them safely for the rewrite pipeline:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Only regular files are selected; devices, pipes and sockets never are
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Bounded reads keep an oversized file from being pulled into memory

use std::ffi::OsStr;
use std::io::Read;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::backup::BACKUP_DIR_PREFIX;
use crate::config::FsSourceConfig;
use crate::error::{ScanError, ScanErrorKind};

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// Result of attempting to read a file.
pub enum ScanResult {
    /// File was read successfully; contains the UTF-8 content.
    Ok(String),
    /// File could not be read; contains the scan error.
    Err(ScanError),
}

/// A file picked for the preview, with the content it was picked for.
#[derive(Debug, Clone)]
pub struct SampledFile {
    pub path: PathBuf,
    pub content: String,
}

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
///
/// Backup trees from earlier runs are skipped so originals are never rewritten.
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name) && !name.starts_with(BACKUP_DIR_PREFIX);
    }
    true
}

/// Check if the file name ends with one of the configured suffixes.
fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .map(OsStr::to_string_lossy)
        .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext.as_str())))
}

fn compile_excludes(config: &FsSourceConfig, scan_errors: &mut Vec<ScanError>) -> Vec<Pattern> {
    let mut exclude_patterns = Vec::with_capacity(config.exclude.len());
    for pat_str in &config.exclude {
        match Pattern::new(pat_str) {
            Ok(pat) => exclude_patterns.push(pat),
            Err(e) => scan_errors.push(ScanError::new(
                pat_str,
                ScanErrorKind::InvalidExcludePattern,
                format!("Invalid exclude glob pattern '{pat_str}': {e}"),
            )),
        }
    }
    exclude_patterns
}

/// Walk `config.root` in file-name order, handing every selected file to `visit`.
///
/// Walk errors are recorded in `scan_errors` and the walk continues.
fn walk_selected<F>(config: &FsSourceConfig, scan_errors: &mut Vec<ScanError>, mut visit: F)
where
    F: FnMut(&Path) -> ControlFlow<()>,
{
    let exclude_patterns = compile_excludes(config, scan_errors);
    let root = &config.root;

    for entry_result in WalkDir::new(root)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_not_skip_dir)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.clone(), Path::to_path_buf);
                scan_errors.push(ScanError::new(
                    path,
                    ScanErrorKind::WalkError,
                    format!("Directory traversal error: {walk_err}"),
                ));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_path = entry.path();
        if !matches_extension(file_path, &config.extensions) {
            continue;
        }
        if matches_exclude(file_path, &exclude_patterns) {
            debug!(file = %file_path.display(), "Excluded by pattern");
            continue;
        }

        if visit(file_path).is_break() {
            break;
        }
    }
}

/// Find every file under the root with a configured extension.
///
/// Returns `(files, scan_errors)`; walk errors never abort discovery.
pub fn find_files(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut scan_errors = Vec::new();
    walk_selected(config, &mut scan_errors, |path| {
        files.push(path.to_path_buf());
        ControlFlow::Continue(())
    });
    (files, scan_errors)
}

/// Pick up to `limit` files whose content contains one of `needles`.
///
/// Files that cannot be read are passed over.
pub fn sample_files(
    config: &FsSourceConfig,
    needles: &[String],
    limit: usize,
) -> (Vec<SampledFile>, Vec<ScanError>) {
    let mut samples = Vec::new();
    let mut scan_errors = Vec::new();
    if limit == 0 {
        return (samples, scan_errors);
    }

    walk_selected(config, &mut scan_errors, |path| {
        let content = match read_file_bounded(path, config.max_file_size) {
            ScanResult::Ok(c) => c,
            ScanResult::Err(e) => {
                debug!(file = %path.display(), "Skipping unreadable sample: {}", e.message);
                return ControlFlow::Continue(());
            }
        };
        if needles.iter().any(|n| content.contains(n.as_str())) {
            samples.push(SampledFile {
                path: path.to_path_buf(),
                content,
            });
        }
        if samples.len() >= limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    (samples, scan_errors)
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Returns `ScanResult::Err` if:
/// - The file exceeds `max_file_size`
/// - An I/O error occurs
/// - The content is not valid UTF-8
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> ScanResult {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return ScanResult::Err(ScanError::new(
                path,
                ScanErrorKind::IoError,
                format!("Error reading file: {e}"),
            ));
        }
    };

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    if let Err(e) = file.take(max_file_size + 1).read_to_end(&mut buffer) {
        return ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::IoError,
            format!("Error reading file: {e}"),
        ));
    }

    if buffer.len() as u64 > max_file_size {
        return ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::FileTooLarge,
            format!("File exceeds maximum size of {max_file_size} bytes"),
        ));
    }

    match String::from_utf8(buffer) {
        Ok(content) => ScanResult::Ok(content),
        Err(_) => ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::InvalidEncoding,
            "File is not valid UTF-8".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> FsSourceConfig {
        let mut cfg = FsSourceConfig::default();
        cfg.root = root.to_path_buf();
        cfg
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_find_files_filters_by_suffix() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.html", "b.php", "c.png", "d.TXT", "e.Html", "f.inc"] {
            fs::write(tmp.path().join(name), "x").unwrap();
        }

        let (files, errors) = find_files(&config_for(tmp.path()));
        assert!(errors.is_empty());
        assert_eq!(names(&files), vec!["a.html", "b.php", "d.TXT", "f.inc"]);
    }

    #[test]
    fn test_find_files_recurses_and_skips_backups() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("vendor/bootstrap")).unwrap();
        fs::create_dir_all(tmp.path().join("bootstrap_update_backup_20240101_000000")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join("vendor/bootstrap/page.html"), "x").unwrap();
        fs::write(
            tmp.path().join("bootstrap_update_backup_20240101_000000/page.html"),
            "x",
        )
        .unwrap();
        fs::write(tmp.path().join(".git/config.txt"), "x").unwrap();

        let (files, _) = find_files(&config_for(tmp.path()));
        assert_eq!(files, vec![tmp.path().join("vendor/bootstrap/page.html")]);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.html"), "x").unwrap();
        let mut cfg = config_for(tmp.path());
        cfg.exclude = vec!["[".to_owned(), "a.*".to_owned()];

        let (files, errors) = find_files(&cfg);
        assert!(files.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ScanErrorKind::InvalidExcludePattern);
    }

    #[test]
    fn test_sample_files_requires_needle_and_stops_at_limit() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.html"), "<link href=\"bootstrap.css\">").unwrap();
        fs::write(tmp.path().join("b.html"), "<p>plain</p>").unwrap();
        fs::write(tmp.path().join("c.tpl"), "<script src=\"bootstrap.min.js\">").unwrap();
        fs::write(tmp.path().join("d.php"), "bootstrap.min.css").unwrap();

        let mut cfg = config_for(tmp.path());
        cfg.extensions = vec![".html".to_owned(), ".tpl".to_owned(), ".php".to_owned()];
        let needles = vec!["bootstrap.css".to_owned(), "bootstrap.min.js".to_owned()];

        let (samples, _) = sample_files(&cfg, &needles, 5);
        let paths: Vec<_> = samples.iter().map(|s| s.path.clone()).collect();
        assert_eq!(names(&paths), vec!["a.html", "c.tpl"]);

        let (samples, _) = sample_files(&cfg, &needles, 1);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].content.contains("bootstrap.css"));
    }

    #[test]
    fn test_read_file_bounded_too_large() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.html");
        fs::write(&path, "0123456789").unwrap();

        match read_file_bounded(&path, 4) {
            ScanResult::Err(e) => assert_eq!(e.kind, ScanErrorKind::FileTooLarge),
            ScanResult::Ok(_) => panic!("expected size error"),
        }
    }

    #[test]
    fn test_read_file_bounded_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.html");
        fs::write(&path, [0x3c, 0x70, 0x3e, 0xe9, 0xff]).unwrap();

        match read_file_bounded(&path, 1024) {
            ScanResult::Err(e) => assert_eq!(e.kind, ScanErrorKind::InvalidEncoding),
            ScanResult::Ok(_) => panic!("expected encoding error"),
        }
    }
}
