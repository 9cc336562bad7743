//! Configuration type definitions.
//!
//! These types are pure data - no I/O or complex logic.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Site settings
// =============================================================================

/// Site-wide settings, loaded from `quire.yaml`.
///
/// ```yaml
/// site_title: My Site
/// base_url: https://example.com
/// theme: themes/default
/// date_format: "%-d %b %Y"
/// pages_order_by: date
/// pages_order: desc
/// excerpt_length: 50
/// ```
///
/// Keys not listed here are kept in `extra` and exposed to templates as
/// `config.<key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Site name shown by themes
    #[serde(default = "default_site_title")]
    pub site_title: String,

    /// Absolute URL the site is served from, without trailing slash.
    /// Required: routing is meaningless without it.
    #[serde(default)]
    pub base_url: String,

    /// Theme directory, relative to the site root
    #[serde(default = "default_theme")]
    pub theme: PathBuf,

    /// strftime-style pattern used for `date_formatted`
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How the page index is ordered
    #[serde(default)]
    pub pages_order_by: OrderBy,

    /// Ascending or descending index order
    #[serde(default)]
    pub pages_order: SortOrder,

    /// Number of words kept in page excerpts
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Index subdirectories of the served page's directory too
    #[serde(default)]
    pub index_recursive: bool,

    /// Content directory (the document root), relative to the site root
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Extension of content files, including the dot
    #[serde(default = "default_content_ext")]
    pub content_ext: String,

    /// Name of the plugin directories looked up through the cascade
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: String,

    /// Markdown processing options
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Any other keys, passed through to templates
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_site_title() -> String {
    "quire".to_string()
}

fn default_theme() -> PathBuf {
    PathBuf::from("themes/default")
}

fn default_date_format() -> String {
    "%-d %b %Y".to_string()
}

fn default_excerpt_length() -> usize {
    50
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_content_ext() -> String {
    ".md".to_string()
}

fn default_plugins_dir() -> String {
    "plugins".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            base_url: String::new(),
            theme: default_theme(),
            date_format: default_date_format(),
            pages_order_by: OrderBy::default(),
            pages_order: SortOrder::default(),
            excerpt_length: default_excerpt_length(),
            index_recursive: false,
            content_dir: default_content_dir(),
            content_ext: default_content_ext(),
            plugins_dir: default_plugins_dir(),
            markdown: MarkdownConfig::default(),
            extra: HashMap::new(),
        }
    }
}

/// Index ordering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Order by page URL
    #[default]
    Alpha,
    /// Order by the `Date` header, as written
    Date,
}

/// Index sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Markdown configuration
// =============================================================================

/// Markdown processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Enabled pulldown-cmark extensions
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "tables".to_string(),
        "footnotes".to_string(),
        "strikethrough".to_string(),
        "tasklists".to_string(),
        "heading_attributes".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}
