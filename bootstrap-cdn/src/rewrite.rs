//! Pattern-by-pattern substitution of asset references.

use std::borrow::Cow;

use regex::Captures;
use serde::Serialize;

use crate::patterns::{
    AssetKind, PatternEntry, PatternKind, full_patterns, quoted_attributes, tag_patterns,
};
use crate::target::CdnTarget;

/// Attributes the pinned stylesheet tag always sets itself.
const RESERVED_ATTRIBUTES: &[&str] = &["href", "rel", "integrity", "crossorigin"];

/// Which variant of the substitution to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Full pattern set; stylesheet tags keep their extra attributes.
    Apply,
    /// Tag patterns only; replacement tags are emitted bare.
    Preview,
}

impl Profile {
    fn patterns(self) -> &'static [PatternEntry] {
        match self {
            Self::Apply => full_patterns(),
            Self::Preview => tag_patterns(),
        }
    }

    fn preserves_attributes(self) -> bool {
        self == Self::Apply
    }
}

/// One replacement that changed the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub kind: PatternKind,
    /// The asset URL as written in the matched reference.
    pub url: String,
    /// Literal matched text.
    pub matched: String,
    /// Literal text it was replaced with.
    pub replacement: String,
}

/// Result of rewriting one file's content.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub content: String,
    pub changed: bool,
    pub substitutions: Vec<Substitution>,
}

impl Rewrite {
    /// Number of substitutions of the given asset kind.
    #[must_use]
    pub fn count(&self, asset: AssetKind) -> usize {
        self.substitutions
            .iter()
            .filter(|s| s.kind.asset() == asset)
            .count()
    }
}

fn render(kind: PatternKind, matched: &str, target: &CdnTarget, profile: Profile) -> String {
    match kind {
        PatternKind::CssImport => target.import_statement(),
        PatternKind::CssLocal | PatternKind::CssCdn => {
            if profile.preserves_attributes() {
                target.stylesheet_tag(&extra_attributes(matched))
            } else {
                target.stylesheet_tag(&[])
            }
        }
        PatternKind::JsLocal | PatternKind::JsCdn => target.script_tag(),
    }
}

/// Attributes of `tag` outside the reserved set, first occurrence of each name.
fn extra_attributes(tag: &str) -> Vec<(String, String)> {
    let mut extra: Vec<(String, String)> = Vec::new();
    for (name, value) in quoted_attributes(tag) {
        let reserved = RESERVED_ATTRIBUTES
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&name));
        let seen = extra.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name));
        if !reserved && !seen {
            extra.push((name, value));
        }
    }
    extra
}

/// Apply every pattern of `profile`, in order, over the whole of `content`.
#[must_use]
pub fn rewrite_content(content: &str, target: &CdnTarget, profile: Profile) -> Rewrite {
    let mut current = content.to_owned();
    let mut substitutions = Vec::new();

    for entry in profile.patterns() {
        let replaced = entry.regex.replace_all(&current, |caps: &Captures<'_>| {
            let matched = caps.get(0).map_or("", |m| m.as_str());
            let url = caps.name("url").map_or("", |m| m.as_str());
            let replacement = render(entry.kind, matched, target, profile);
            // A reference already in its pinned form is rewritten onto itself and not counted.
            if replacement != matched {
                substitutions.push(Substitution {
                    kind: entry.kind,
                    url: url.to_owned(),
                    matched: matched.to_owned(),
                    replacement: replacement.clone(),
                });
            }
            replacement
        });
        let next = match replaced {
            Cow::Borrowed(_) => continue,
            Cow::Owned(next) => next,
        };
        current = next;
    }

    let changed = current != content;
    Rewrite {
        content: current,
        changed,
        substitutions,
    }
}

/// A numbered line of rewritten content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcerptLine {
    /// 1-based line number.
    pub number: usize,
    pub text: String,
}

/// The first line mentioning a pinned URL, with `context` lines either side.
#[must_use]
pub fn excerpt(content: &str, target: &CdnTarget, context: usize) -> Vec<ExcerptLine> {
    let lines: Vec<&str> = content.lines().collect();
    let Some(hit) = lines.iter().position(|line| target.is_referenced_by(line)) else {
        return Vec::new();
    };
    let start = hit.saturating_sub(context);
    let end = (hit + context + 1).min(lines.len());
    lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, text)| ExcerptLine {
            number: start + offset + 1,
            text: (*text).to_owned(),
        })
        .collect()
}
