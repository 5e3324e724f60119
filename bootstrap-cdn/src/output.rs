//! Shared output formatting for run reports.
//!
//! Provides JSON and plain-text formatters. Color/terminal formatting is
//! left to the CLI layer.

use std::io::Write;

use serde::Serialize;

use crate::patterns::AssetKind;
use crate::report::{FilePreview, PreviewReport, RunReport};

/// How many per-file errors the human summary lists before truncating.
pub const MAX_DISPLAYED_ERRORS: usize = 10;

/// Format any report as pretty JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<T: Serialize>(report: &T, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `RunReport` as a human-readable summary.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &RunReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "=== Update Summary ===")?;
    writeln!(writer, "Files processed: {}", report.files_processed)?;
    writeln!(writer, "Files updated: {}", report.files_updated)?;
    writeln!(writer, "CSS references updated: {}", report.css_references_updated)?;
    writeln!(writer, "JS references updated: {}", report.js_references_updated)?;

    if !report.errors.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Errors encountered: {}", report.errors_count())?;
        for error in report.errors.iter().take(MAX_DISPLAYED_ERRORS) {
            writeln!(writer, "  - {}", error.format_human_readable())?;
        }
        if report.errors_count() > MAX_DISPLAYED_ERRORS {
            writeln!(
                writer,
                "  ... and {} more errors",
                report.errors_count() - MAX_DISPLAYED_ERRORS
            )?;
        }
    }

    writeln!(writer)?;
    if report.dry_run {
        writeln!(writer, "Dry run: no files were written")?;
    } else if let Some(dir) = &report.backup_dir {
        writeln!(writer, "Backup created at: {}", dir.display())?;
    } else {
        writeln!(writer, "No files changed, no backup created")?;
    }
    Ok(())
}

fn write_file_preview(preview: &FilePreview, writer: &mut dyn Write) -> anyhow::Result<()> {
    let rule = "=".repeat(60);
    writeln!(writer)?;
    writeln!(writer, "{rule}")?;
    writeln!(writer, "File: {}", preview.file.display())?;
    writeln!(writer, "{rule}")?;

    for asset in [AssetKind::Stylesheet, AssetKind::Script] {
        let mut subs = preview
            .substitutions
            .iter()
            .filter(|s| s.kind.asset() == asset)
            .peekable();
        if subs.peek().is_none() {
            continue;
        }
        writeln!(writer)?;
        writeln!(writer, "{} References to update:", asset.label())?;
        for sub in subs {
            writeln!(writer, "  - Found: {}", sub.matched)?;
            writeln!(writer, "    Will replace with: {}", sub.replacement)?;
        }
    }

    if !preview.excerpt.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Sample of updated content:")?;
        writeln!(writer, "  ...")?;
        for line in &preview.excerpt {
            writeln!(writer, "  {}: {}", line.number, line.text)?;
        }
        writeln!(writer, "  ...")?;
    }
    Ok(())
}

/// Format a `PreviewReport` as human-readable text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_preview(report: &PreviewReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    for preview in &report.files {
        if preview.changed {
            write_file_preview(preview, writer)?;
        } else {
            writeln!(writer)?;
            writeln!(
                writer,
                "{}: No Bootstrap references found to update",
                preview.file.display()
            )?;
        }
    }

    for error in &report.errors {
        writeln!(writer)?;
        writeln!(writer, "Error processing {}", error.format_human_readable())?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(60))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScanError, ScanErrorKind};
    use crate::rewrite::{Profile, excerpt, rewrite_content};
    use crate::target::CdnTarget;
    use std::path::PathBuf;

    fn render_human(report: &RunReport) -> String {
        let mut buf = Vec::new();
        write_human(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_counts_and_backup() {
        let report = RunReport {
            files_processed: 12,
            files_updated: 3,
            css_references_updated: 3,
            js_references_updated: 2,
            backup_dir: Some(PathBuf::from("/srv/bootstrap_update_backup_20240101_000000")),
            ..RunReport::default()
        };
        let out = render_human(&report);
        assert!(out.contains("Files processed: 12\n"));
        assert!(out.contains("Files updated: 3\n"));
        assert!(out.contains("CSS references updated: 3\n"));
        assert!(out.contains("JS references updated: 2\n"));
        assert!(out.contains("Backup created at: /srv/bootstrap_update_backup_20240101_000000"));
        assert!(!out.contains("Errors encountered"));
    }

    #[test]
    fn test_summary_truncates_errors() {
        let errors = (0..13)
            .map(|i| {
                ScanError::new(
                    format!("page{i}.html"),
                    ScanErrorKind::IoError,
                    "Error reading file: denied".to_owned(),
                )
            })
            .collect();
        let report = RunReport {
            errors,
            ..RunReport::default()
        };
        let out = render_human(&report);
        assert!(out.contains("Errors encountered: 13"));
        assert!(out.contains("  - page9.html: Error reading file: denied"));
        assert!(!out.contains("page10.html"));
        assert!(out.contains("  ... and 3 more errors"));
        assert!(out.contains("No files changed, no backup created"));
    }

    #[test]
    fn test_preview_lists_matches_and_excerpt() {
        let target = CdnTarget::BOOTSTRAP_5_3_3;
        let original = "<head>\n<link href=\"css/bootstrap.min.css\" rel=\"stylesheet\">\n</head>\n";
        let rewrite = rewrite_content(original, &target, Profile::Preview);
        let report = PreviewReport {
            files: vec![FilePreview {
                file: PathBuf::from("html/index.html"),
                changed: rewrite.changed,
                excerpt: excerpt(&rewrite.content, &target, 1),
                substitutions: rewrite.substitutions,
            }],
            errors: Vec::new(),
        };

        let mut buf = Vec::new();
        write_preview(&report, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("File: html/index.html"));
        assert!(out.contains("CSS References to update:"));
        assert!(out.contains("  - Found: <link href=\"css/bootstrap.min.css\" rel=\"stylesheet\">"));
        assert!(out.contains(&format!("    Will replace with: {}", target.stylesheet_tag(&[]))));
        assert!(!out.contains("JS References"));
        assert!(out.contains("  1: <head>"));
        assert!(out.contains("  3: </head>"));
    }

    #[test]
    fn test_json_output_contract() {
        let report = RunReport {
            files_processed: 1,
            dry_run: true,
            ..RunReport::default()
        };
        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["files_processed"], 1);
        assert_eq!(json["dry_run"], true);
        assert!(json["errors"].as_array().unwrap().is_empty());
        assert!(json["backup_dir"].is_null());
    }
}
