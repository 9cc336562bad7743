//! Page metadata read from the header comment of a content file.
//!
//! A header is any line of the form `Label: value`, optionally behind comment
//! leaders, typically inside a leading `/* ... */` block:
//!
//! ```text
//! /*
//! Title: Welcome
//! Date: 2024-03-01
//! */
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

/// Header labels to look for, keyed by metadata field.
///
/// Lookup order is insertion order; labels match case-insensitively.
#[derive(Debug, Clone)]
pub struct HeaderSpec {
    fields: Vec<HeaderField>,
}

#[derive(Debug, Clone)]
struct HeaderField {
    field: String,
    label: String,
    /// Compiled once per label; `None` only if the escaped label is rejected
    pattern: Option<Regex>,
}

impl HeaderField {
    fn new(field: String, label: String) -> Self {
        let pattern = label_pattern(&label);
        Self {
            field,
            label,
            pattern,
        }
    }

    fn value(&self, content: &str) -> Option<String> {
        let raw = self.pattern.as_ref()?.captures(content)?.get(1)?.as_str();
        Some(comment_close().replace(raw, "").trim().to_string())
    }
}

fn label_pattern(label: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?mi)^[ \t/*#@<!-]*{}:(.*)$", regex::escape(label))).ok()
}

impl PartialEq for HeaderSpec {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for HeaderSpec {}

impl HeaderSpec {
    /// A header set with no fields.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add or relabel a field.
    pub fn insert(&mut self, field: impl Into<String>, label: impl Into<String>) {
        let field = field.into();
        let label = label.into();
        match self.fields.iter_mut().find(|h| h.field == field) {
            Some(entry) if entry.label == label => {}
            Some(entry) => *entry = HeaderField::new(field, label),
            None => self.fields.push(HeaderField::new(field, label)),
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.fields.retain(|h| h.field != field);
    }

    pub fn label(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|h| h.field == field)
            .map(|h| h.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|h| (h.field.as_str(), h.label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for HeaderSpec {
    fn default() -> Self {
        let mut headers = Self::empty();
        for (field, label) in [
            ("title", "Title"),
            ("description", "Description"),
            ("author", "Author"),
            ("date", "Date"),
            ("robots", "Robots"),
            ("template", "Template"),
        ] {
            headers.insert(field, label);
        }
        headers
    }
}

/// Metadata of one content file.
///
/// Values for fields outside the built-in set land in `extra` and are
/// exposed to templates alongside the named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Date exactly as written in the header
    pub date: String,
    /// `date` rendered with the configured date format, or empty
    pub date_formatted: String,
    pub robots: String,
    pub template: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PageMetadata {
    /// Value of `field`, built-in or extra.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "title" => &self.title,
            "description" => &self.description,
            "author" => &self.author,
            "date" => &self.date,
            "date_formatted" => &self.date_formatted,
            "robots" => &self.robots,
            "template" => &self.template,
            other => return self.extra.get(other).map(String::as_str),
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = value,
            "description" => self.description = value,
            "author" => self.author = value,
            "date" => self.date = value,
            "date_formatted" => self.date_formatted = value,
            "robots" => self.robots = value,
            "template" => self.template = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }
}

/// Read the headers named by `headers` out of `content`.
///
/// Every field in `headers` is present in the result, empty when its label
/// is absent. `date_formatted` is derived from `date`.
pub fn read_file_meta(content: &str, headers: &HeaderSpec, date_format: &str) -> PageMetadata {
    let mut meta = PageMetadata::default();

    for header in &headers.fields {
        meta.set(&header.field, header.value(content).unwrap_or_default());
    }

    if !meta.date.is_empty() {
        meta.date_formatted = format_date(&meta.date, date_format);
    }
    meta
}

fn comment_close() -> &'static Regex {
    static CLOSE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"\s*(?:\*/|-->|\?>).*").expect("comment close pattern is valid")
    });
    &CLOSE
}

/// Format a header date with a strftime-style `format`.
///
/// Returns an empty string when the date cannot be parsed or the format is
/// invalid.
pub fn format_date(date: &str, format: &str) -> String {
    let Some(parsed) = parse_date(date.trim()) else {
        return String::new();
    };
    let mut out = String::new();
    match write!(out, "{}", parsed.format(format)) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

fn parse_date(date: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        return Some(dt.naive_local());
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Some(dt);
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(date, format) {
            return day.and_hms_opt(0, 0, 0);
        }
    }
    None
}
