//! Input sanitization for values persisted from response payloads.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Remove all HTML tags from a string before it is stored.
pub fn strip_html_tags(value: &str) -> String {
    HTML_TAG_RE.replace_all(value, "").into_owned()
}
