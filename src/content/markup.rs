//! Markup to HTML conversion.

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use crate::config::MarkdownConfig;

static HEADER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.+?\*/").expect("header block pattern is valid"));

/// Placeholder replaced with the site base URL before rendering.
pub const BASE_URL_PLACEHOLDER: &str = "%base_url%";

#[derive(thiserror::Error, Debug)]
pub enum MarkupError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Converts page source into HTML.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// CommonMark renderer with configurable extensions.
///
/// Headings without an explicit id get one derived from their text.
#[derive(Debug, Clone)]
pub struct Markdown {
    options: Options,
}

impl Markdown {
    pub fn new(config: &MarkdownConfig) -> Result<Self, MarkupError> {
        let mut options = Options::empty();
        for extension in &config.extensions {
            match extension.as_str() {
                "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
                "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
                "gfm" => options.insert(Options::ENABLE_GFM),
                "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
                "smart_punctuation" => options.insert(Options::ENABLE_SMART_PUNCTUATION),
                "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
                "tables" => options.insert(Options::ENABLE_TABLES),
                "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
                other => return Err(MarkupError::InvalidExtension(other.to_string())),
            }
        }
        Ok(Self { options })
    }
}

impl MarkupRenderer for Markdown {
    fn render(&self, source: &str) -> String {
        let mut used_ids: HashSet<String> = HashSet::new();
        let mut heading: Option<(pulldown_cmark::HeadingLevel, Vec<String>)> = None;
        let mut heading_html = String::new();
        let mut heading_text = String::new();

        let events: Vec<Event> = Parser::new_ext(source, self.options)
            .flat_map(|event| match event {
                Event::Start(Tag::Heading {
                    level,
                    ref id,
                    ref classes,
                    ..
                }) => {
                    if let Some(existing) = id {
                        used_ids.insert(existing.to_string());
                        return vec![event];
                    }
                    heading = Some((level, classes.iter().map(|c| c.to_string()).collect()));
                    heading_html.clear();
                    heading_text.clear();
                    vec![]
                }
                Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                    let Some((level, classes)) = heading.take() else {
                        return vec![];
                    };
                    let base = slugify(&heading_text);
                    let mut id = base.clone();
                    let mut suffix = 1;
                    while used_ids.contains(&id) {
                        id = format!("{base}-{suffix}");
                        suffix += 1;
                    }
                    used_ids.insert(id.clone());

                    let class_attr = if classes.is_empty() {
                        String::new()
                    } else {
                        format!(" class=\"{}\"", classes.join(" "))
                    };
                    let level = level as usize;
                    vec![Event::Html(
                        format!("<h{level} id=\"{id}\"{class_attr}>{heading_html}</h{level}>\n")
                            .into(),
                    )]
                }
                event if heading.is_some() => {
                    if let Event::Text(text) | Event::Code(text) = &event {
                        heading_text.push_str(text);
                    }
                    html::push_html(&mut heading_html, std::iter::once(event));
                    vec![]
                }
                _ => vec![event],
            })
            .collect();

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        output
    }
}

/// Render page source to HTML.
///
/// Comment blocks (including the metadata header) are removed and the base
/// URL placeholder is substituted before the markup is rendered.
pub fn parse_content(raw: &str, base_url: &str, renderer: &dyn MarkupRenderer) -> String {
    let stripped = HEADER_BLOCK.replace_all(raw, "");
    let content = stripped.replace(BASE_URL_PLACEHOLDER, base_url);
    renderer.render(&content)
}

/// Convert a string to a slug suitable for use as an HTML id.
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}
