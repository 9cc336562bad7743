//! Shared string helpers.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Collapse runs of `/` into a single separator.
///
/// "/site//content///posts" -> "/site/content/posts"
pub fn normalize_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_slash = false;
    for c in s.chars() {
        if c == '/' {
            if !last_was_slash {
                out.push(c);
            }
            last_was_slash = true;
        } else {
            out.push(c);
            last_was_slash = false;
        }
    }
    out
}

/// Join string fragments into a path with duplicate separators removed.
pub fn join_normalized(parts: &[&str]) -> PathBuf {
    PathBuf::from(normalize_slashes(&parts.join("/")))
}

/// Path as a forward-slash string.
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Keep the first `limit` space-separated words, appending `&hellip;` when
/// anything was cut.
pub fn limit_words(s: &str, limit: usize) -> String {
    let words: Vec<&str> = s.split(' ').collect();
    let mut excerpt = words
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if words.len() > limit {
        excerpt.push_str("&hellip;");
    }
    excerpt
}

/// Remove anything that looks like a markup tag.
pub fn strip_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, "").into_owned()
}
