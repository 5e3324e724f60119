//! The pinned CDN release every reference is rewritten to.

/// CDN URLs and Subresource Integrity hashes for one Bootstrap release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdnTarget {
    pub version: &'static str,
    pub css_url: &'static str,
    pub css_integrity: &'static str,
    pub js_url: &'static str,
    pub js_integrity: &'static str,
}

impl CdnTarget {
    /// Bootstrap 5.3.3 served from jsDelivr.
    pub const BOOTSTRAP_5_3_3: Self = Self {
        version: "5.3.3",
        css_url: "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css",
        css_integrity: "sha384-QWTKZyjpPEjISv5WaRU9OFeRpok6YctnYmDr5pNlyT2bRjXh0JMhjY6hW+ALEwIH",
        js_url: "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js",
        js_integrity: "sha384-YvpcrYf0tY3lHB60NNkmXc5s9fDVZLESaAA55NDzOxhy9GkcIdslK1eN7N6jIeHz",
    };

    /// Single-line stylesheet tag, followed by `extra` attributes in order.
    ///
    /// Extra values are always double-quoted, so a literal `"` in one is written as `&quot;`.
    #[must_use]
    pub fn stylesheet_tag(&self, extra: &[(String, String)]) -> String {
        let mut tag = format!(
            r#"<link rel="stylesheet" href="{}" integrity="{}" crossorigin="anonymous""#,
            self.css_url, self.css_integrity
        );
        for (name, value) in extra {
            tag.push(' ');
            tag.push_str(name);
            tag.push_str("=\"");
            tag.push_str(&value.replace('"', "&quot;"));
            tag.push('"');
        }
        tag.push('>');
        tag
    }

    /// `@import` statement for the stylesheet.
    #[must_use]
    pub fn import_statement(&self) -> String {
        format!(r#"@import "{}";"#, self.css_url)
    }

    /// Script tag with an empty body.
    #[must_use]
    pub fn script_tag(&self) -> String {
        format!(
            r#"<script src="{}" integrity="{}" crossorigin="anonymous"></script>"#,
            self.js_url, self.js_integrity
        )
    }

    /// Whether `line` mentions either pinned URL.
    #[must_use]
    pub fn is_referenced_by(&self, line: &str) -> bool {
        line.contains(self.css_url) || line.contains(self.js_url)
    }
}

impl Default for CdnTarget {
    fn default() -> Self {
        Self::BOOTSTRAP_5_3_3
    }
}
