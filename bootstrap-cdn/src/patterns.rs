//! Matchers for Bootstrap asset references.
//!
//! Every pattern captures the referenced asset URL in a group named `url`.
//! Matching is lexical: case-insensitive, with `.` spanning newlines so a tag
//! split over several lines is still found.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Hosts that have served Bootstrap builds.
const CDN_HOSTS: &str = concat!(
    r"(?:maxcdn\.bootstrapcdn\.com",
    r"|stackpath\.bootstrapcdn\.com",
    r"|netdna\.bootstrapcdn\.com",
    r"|cdn\.jsdelivr\.net",
    r"|unpkg\.com)",
);

/// Relative path prefix and directory part of a local reference.
///
/// A local path never contains `:` and never starts with `//`, so absolute and
/// protocol-relative URLs are left to the CDN matchers. The directory part
/// cannot cross a quote or `>`, which keeps a match inside one attribute.
const LOCAL_DIRS_CSS: &str = concat!(
    r"(?:\./)?(?:\.\./)*/?",
    r"(?:assets/|css/|plugins/|vendor/)?",
    r#"(?:[^"'>:/][^"'>:]*?/)?"#,
);

const LOCAL_DIRS_JS: &str = concat!(
    r"(?:\./)?(?:\.\./)*/?",
    r"(?:assets/|js/|plugins/|vendor/)?",
    r#"(?:[^"'>:/][^"'>:]*?/)?"#,
);

const CSS_FILE: &str = r"bootstrap(?:\.min)?\.css";
const JS_FILE: &str = r"bootstrap(?:\.min|\.bundle(?:\.min)?)?\.js";

/// Versioned npm-style path on a known host, ending at `file`.
fn cdn_url(file: &str) -> String {
    format!(r#"(?:https?:)?//{CDN_HOSTS}/(?:npm/)?bootstrap[@/][^"']*?{file}"#)
}

fn local_url(dirs: &str, file: &str) -> String {
    format!("{dirs}{file}")
}

fn link_tag(url: &str) -> String {
    format!(r#"<link[^>]*?href\s*=\s*["'](?P<url>{url})["'][^>]*?/?>"#)
}

fn script_tag(url: &str) -> String {
    format!(r#"<script[^>]*?src\s*=\s*["'](?P<url>{url})["'][^>]*?(?:/\s*>|>.*?</script>)"#)
}

fn import_rule(url: &str) -> String {
    format!(r#"@import\s+(?:url\s*\(\s*)?["'](?P<url>{url})["'](?:\s*\))?;?"#)
}

fn compile(pattern: &str) -> Regex {
    match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
    {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid asset pattern: {err}"),
    }
}

/// The asset type a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

impl AssetKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Stylesheet => "CSS",
            Self::Script => "JS",
        }
    }
}

/// Which form of reference a pattern recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    /// `<link>` to a file bundled with the site.
    CssLocal,
    /// `<link>` to a previously used CDN build.
    CssCdn,
    /// CSS `@import` of a bundled or CDN stylesheet.
    CssImport,
    /// `<script>` loading a bundled file.
    JsLocal,
    /// `<script>` loading a previously used CDN build.
    JsCdn,
}

impl PatternKind {
    #[must_use]
    pub fn asset(self) -> AssetKind {
        match self {
            Self::CssLocal | Self::CssCdn | Self::CssImport => AssetKind::Stylesheet,
            Self::JsLocal | Self::JsCdn => AssetKind::Script,
        }
    }

    /// Short category label, e.g. `css_local`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CssLocal => "css_local",
            Self::CssCdn => "css_cdn",
            Self::CssImport => "css_import",
            Self::JsLocal => "js_local",
            Self::JsCdn => "js_cdn",
        }
    }
}

/// A compiled matcher and the kind of reference it recognizes.
#[derive(Debug)]
pub struct PatternEntry {
    pub kind: PatternKind,
    pub regex: Regex,
}

impl PatternEntry {
    fn new(kind: PatternKind) -> Self {
        let css_local = local_url(LOCAL_DIRS_CSS, CSS_FILE);
        let css_cdn = cdn_url(CSS_FILE);
        let pattern = match kind {
            PatternKind::CssLocal => link_tag(&css_local),
            PatternKind::CssCdn => link_tag(&css_cdn),
            PatternKind::CssImport => import_rule(&format!("{css_local}|{css_cdn}")),
            PatternKind::JsLocal => script_tag(&local_url(LOCAL_DIRS_JS, JS_FILE)),
            PatternKind::JsCdn => script_tag(&cdn_url(JS_FILE)),
        };
        Self {
            kind,
            regex: compile(&pattern),
        }
    }
}

/// Stylesheet matchers first, then script matchers, in application order.
static FULL_PATTERNS: LazyLock<Vec<PatternEntry>> = LazyLock::new(|| {
    [
        PatternKind::CssLocal,
        PatternKind::CssCdn,
        PatternKind::CssImport,
        PatternKind::JsLocal,
        PatternKind::JsCdn,
    ]
    .into_iter()
    .map(PatternEntry::new)
    .collect()
});

/// Same as [`FULL_PATTERNS`] without the `@import` form.
static TAG_PATTERNS: LazyLock<Vec<PatternEntry>> = LazyLock::new(|| {
    [
        PatternKind::CssLocal,
        PatternKind::CssCdn,
        PatternKind::JsLocal,
        PatternKind::JsCdn,
    ]
    .into_iter()
    .map(PatternEntry::new)
    .collect()
});

/// Patterns used by the apply run.
#[must_use]
pub fn full_patterns() -> &'static [PatternEntry] {
    &FULL_PATTERNS
}

/// Patterns used by the preview run.
#[must_use]
pub fn tag_patterns() -> &'static [PatternEntry] {
    &TAG_PATTERNS
}

/// Attribute pairs written as `name="value"` or `name='value'`.
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?P<name>[a-z_:][a-z0-9_:.-]*)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
});

/// Extract every quoted attribute of `tag`, in order of appearance.
#[must_use]
pub fn quoted_attributes(tag: &str) -> Vec<(String, String)> {
    ATTRIBUTE_PATTERN
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str();
            let value = caps.name("dq").or_else(|| caps.name("sq"))?.as_str();
            Some((name.to_owned(), value.to_owned()))
        })
        .collect()
}
