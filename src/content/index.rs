//! Sibling page index and navigation neighbors.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::files::find_files;
use super::markup::{MarkupRenderer, parse_content};
use super::meta::{HeaderSpec, PageMetadata, read_file_meta};
use crate::config::{OrderBy, Settings, SortOrder};
use crate::util::{limit_words, path_str, strip_tags};

/// One page of the index as exposed to templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageEntry {
    pub title: String,
    pub url: String,
    pub file: PathBuf,
    pub author: String,
    pub date: String,
    pub date_formatted: String,
    /// Rendered HTML
    pub content: String,
    /// Tag-stripped, word-limited prefix of `content`
    pub excerpt: String,
    /// Fields added by `get_page_data` subscribers
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Ordered pages of one directory tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageIndex {
    pub pages: Vec<PageEntry>,
}

impl PageIndex {
    pub fn new(pages: Vec<PageEntry>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageEntry> {
        self.pages.iter()
    }

    /// Position of the entry built from `file`.
    pub fn position(&self, file: &Path) -> Option<usize> {
        self.pages.iter().position(|page| page.file == file)
    }
}

/// The entries around the current page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    pub previous: Option<PageEntry>,
    pub current: Option<PageEntry>,
    pub next: Option<PageEntry>,
}

/// Find `file` in `index` with its adjacent entries.
///
/// All three are empty when the file is not indexed; `previous` and `next`
/// are empty at the ends.
pub fn locate_neighbors(index: &PageIndex, file: &Path) -> Neighbors {
    let Some(i) = index.position(file) else {
        return Neighbors::default();
    };
    Neighbors {
        previous: i.checked_sub(1).and_then(|p| index.pages.get(p)).cloned(),
        current: index.pages.get(i).cloned(),
        next: index.pages.get(i + 1).cloned(),
    }
}

/// Directory scanned for the index of `file`.
pub fn anchor_directory(file: &Path) -> PathBuf {
    file.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Builds page indexes from content directories.
pub struct Indexer<'a> {
    settings: &'a Settings,
    content_root: &'a Path,
    headers: &'a HeaderSpec,
    markup: &'a dyn MarkupRenderer,
}

impl<'a> Indexer<'a> {
    pub fn new(
        settings: &'a Settings,
        content_root: &'a Path,
        headers: &'a HeaderSpec,
        markup: &'a dyn MarkupRenderer,
    ) -> Self {
        Self {
            settings,
            content_root,
            headers,
            markup,
        }
    }

    /// Index the content files in `directory`.
    ///
    /// Subdirectories are only scanned when `index_recursive` is set.
    /// `on_page` sees each entry with its metadata before it is ordered and
    /// may extend it. An error from `on_page` aborts the build.
    pub fn build_index<E>(
        &self,
        directory: &Path,
        mut on_page: impl FnMut(&mut PageEntry, &PageMetadata) -> Result<(), E>,
    ) -> Result<PageIndex, E> {
        let ext = &self.settings.content_ext;
        let not_found = format!("404{ext}");

        let mut files = find_files(directory, ext, self.settings.index_recursive);
        files.sort();

        let mut keyed: Vec<(String, PageEntry)> = Vec::with_capacity(files.len());
        for (counter, file) in files
            .into_iter()
            .filter(|f| !is_skipped(f, &not_found))
            .enumerate()
        {
            let raw = match std::fs::read_to_string(&file) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "skipping unreadable page");
                    continue;
                }
            };

            let meta = read_file_meta(&raw, self.headers, &self.settings.date_format);
            let mut entry = self.page_entry(&file, &raw, &meta);
            on_page(&mut entry, &meta)?;

            let key = match self.settings.pages_order_by {
                OrderBy::Alpha => entry.url.clone(),
                OrderBy::Date => format!("{}{counter:06}", meta.date),
            };
            keyed.push((key, entry));
        }

        // Stable sorts keep first-seen order for equal keys
        match self.settings.pages_order {
            SortOrder::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortOrder::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        }

        debug!(directory = %directory.display(), pages = keyed.len(), "built page index");
        Ok(PageIndex::new(keyed.into_iter().map(|(_, e)| e).collect()))
    }

    fn page_entry(&self, file: &Path, raw: &str, meta: &PageMetadata) -> PageEntry {
        let content = parse_content(raw, &self.settings.base_url, self.markup);
        let excerpt = limit_words(&strip_tags(&content), self.settings.excerpt_length);
        PageEntry {
            title: meta.title.clone(),
            url: self.page_url(file),
            file: file.to_path_buf(),
            author: meta.author.clone(),
            date: meta.date.clone(),
            date_formatted: meta.date_formatted.clone(),
            content,
            excerpt,
            extra: serde_json::Map::new(),
        }
    }

    /// Public URL of a content file.
    ///
    /// `<root>/posts/hello.md` -> `<base_url>/posts/hello`,
    /// `<root>/posts/index.md` -> `<base_url>/posts`
    pub fn page_url(&self, file: &Path) -> String {
        let relative = file.strip_prefix(self.content_root).unwrap_or(file);
        let relative = path_str(relative);
        let relative = relative.trim_start_matches('/');
        let route = relative
            .strip_suffix(self.settings.content_ext.as_str())
            .unwrap_or(relative);
        let route = if route == "index" {
            ""
        } else {
            route.strip_suffix("/index").unwrap_or(route)
        };
        format!("{}/{route}", self.settings.base_url)
    }
}

fn is_skipped(file: &Path, not_found: &str) -> bool {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name == not_found || name.ends_with('~') || name.ends_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkdownConfig;
    use crate::content::markup::Markdown;

    fn settings(order_by: OrderBy, order: SortOrder) -> Settings {
        Settings {
            base_url: "http://example.com".to_string(),
            pages_order_by: order_by,
            pages_order: order,
            excerpt_length: 3,
            ..Settings::default()
        }
    }

    fn write_page(root: &Path, name: &str, title: &str, date: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(
            path,
            format!("/*\nTitle: {title}\nDate: {date}\n*/\nSome words for the {title} page"),
        )
        .unwrap();
    }

    fn build(settings: &Settings, root: &Path) -> PageIndex {
        let markup = Markdown::new(&MarkdownConfig::default()).unwrap();
        let headers = HeaderSpec::default();
        Indexer::new(settings, root, &headers, &markup)
            .build_index(root, |_, _| Ok::<_, std::convert::Infallible>(()))
            .unwrap()
    }

    fn titles(index: &PageIndex) -> Vec<&str> {
        index.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_date_desc_keeps_duplicate_dates() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "entry1", "2020-01-01");
        write_page(dir.path(), "b.md", "entry2", "2020-01-01");
        write_page(dir.path(), "c.md", "entry3", "2019-12-31");

        let index = build(&settings(OrderBy::Date, SortOrder::Desc), dir.path());
        assert_eq!(titles(&index), vec!["entry2", "entry1", "entry3"]);
    }

    #[test]
    fn test_date_asc() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "entry1", "2020-01-01");
        write_page(dir.path(), "b.md", "entry2", "2020-01-01");
        write_page(dir.path(), "c.md", "entry3", "2019-12-31");

        let index = build(&settings(OrderBy::Date, SortOrder::Asc), dir.path());
        assert_eq!(titles(&index), vec!["entry3", "entry1", "entry2"]);
    }

    #[test]
    fn test_alpha_orders_by_url() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "zebra.md", "Z", "");
        write_page(dir.path(), "apple.md", "A", "");
        write_page(dir.path(), "mango.md", "M", "");

        let index = build(&settings(OrderBy::Alpha, SortOrder::Asc), dir.path());
        assert_eq!(titles(&index), vec!["A", "M", "Z"]);

        let index = build(&settings(OrderBy::Alpha, SortOrder::Desc), dir.path());
        assert_eq!(titles(&index), vec!["Z", "M", "A"]);
    }

    #[test]
    fn test_subdirectories_not_indexed_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "index.md", "Home", "");
        write_page(dir.path(), "blog/deep.md", "Deep", "");

        let index = build(&settings(OrderBy::Alpha, SortOrder::Asc), dir.path());
        assert_eq!(titles(&index), vec!["Home"]);
    }

    #[test]
    fn test_recursive_index() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "zebra.md", "Z", "");
        write_page(dir.path(), "posts/mango.md", "M", "");

        let settings = Settings {
            index_recursive: true,
            ..settings(OrderBy::Alpha, SortOrder::Asc)
        };
        assert_eq!(titles(&build(&settings, dir.path())), vec!["M", "Z"]);
    }

    #[test]
    fn test_skips_unreadable_pages() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "good.md", "Good", "");
        std::fs::write(dir.path().join("binary.md"), [0x2f, 0x2a, 0xff, 0xfe, 0x00]).unwrap();

        let index = build(&settings(OrderBy::Alpha, SortOrder::Asc), dir.path());
        assert_eq!(titles(&index), vec!["Good"]);
    }

    #[test]
    fn test_skips_404_and_editor_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "page.md", "kept", "");
        write_page(dir.path(), "404.md", "missing", "");
        write_page(dir.path(), "page.md~", "backup", "");
        write_page(dir.path(), "#page.md#", "autosave", "");

        let index = build(&settings(OrderBy::Alpha, SortOrder::Asc), dir.path());
        assert_eq!(titles(&index), vec!["kept"]);
    }

    #[test]
    fn test_entry_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "posts/index.md", "Posts", "2024-03-01");

        let settings = Settings {
            index_recursive: true,
            ..settings(OrderBy::Alpha, SortOrder::Asc)
        };
        let index = build(&settings, dir.path());
        let entry = &index.pages[0];
        assert_eq!(entry.url, "http://example.com/posts");
        assert_eq!(entry.date, "2024-03-01");
        assert_eq!(entry.date_formatted, "1 Mar 2024");
        assert!(entry.content.contains("<p>Some words for the Posts page</p>"));
        assert_eq!(entry.excerpt, "Some words for&hellip;");
    }

    #[test]
    fn test_page_url() {
        let settings = settings(OrderBy::Alpha, SortOrder::Asc);
        let markup = Markdown::new(&MarkdownConfig::default()).unwrap();
        let headers = HeaderSpec::default();
        let root = Path::new("/site/content");
        let indexer = Indexer::new(&settings, root, &headers, &markup);

        assert_eq!(indexer.page_url(&root.join("index.md")), "http://example.com/");
        assert_eq!(indexer.page_url(&root.join("about.md")), "http://example.com/about");
        assert_eq!(
            indexer.page_url(&root.join("posts/index.md")),
            "http://example.com/posts"
        );
        assert_eq!(
            indexer.page_url(&root.join("posts/hello.md")),
            "http://example.com/posts/hello"
        );
    }

    #[test]
    fn test_on_page_extends_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "A", "");

        let settings = settings(OrderBy::Alpha, SortOrder::Asc);
        let markup = Markdown::new(&MarkdownConfig::default()).unwrap();
        let headers = HeaderSpec::default();
        let index = Indexer::new(&settings, dir.path(), &headers, &markup)
            .build_index(dir.path(), |entry, meta| {
                entry
                    .extra
                    .insert("shout".to_string(), meta.title.to_uppercase().into());
                Ok::<_, std::convert::Infallible>(())
            })
            .unwrap();

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json[0]["shout"], "A");
    }

    #[test]
    fn test_on_page_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "A", "");

        let settings = settings(OrderBy::Alpha, SortOrder::Asc);
        let markup = Markdown::new(&MarkdownConfig::default()).unwrap();
        let headers = HeaderSpec::default();
        let result = Indexer::new(&settings, dir.path(), &headers, &markup)
            .build_index(dir.path(), |_, _| Err("stop"));
        assert_eq!(result, Err("stop"));
    }

    fn index_of(n: usize) -> PageIndex {
        PageIndex::new(
            (0..n)
                .map(|i| PageEntry {
                    title: format!("p{i}"),
                    file: PathBuf::from(format!("/c/p{i}.md")),
                    ..PageEntry::default()
                })
                .collect(),
        )
    }

    fn titled(entry: &Option<PageEntry>) -> Option<&str> {
        entry.as_ref().map(|e| e.title.as_str())
    }

    #[test]
    fn test_neighbors_middle() {
        let index = index_of(5);
        let n = locate_neighbors(&index, Path::new("/c/p2.md"));
        assert_eq!(titled(&n.previous), Some("p1"));
        assert_eq!(titled(&n.current), Some("p2"));
        assert_eq!(titled(&n.next), Some("p3"));
    }

    #[test]
    fn test_neighbors_ends() {
        let index = index_of(5);
        let first = locate_neighbors(&index, Path::new("/c/p0.md"));
        assert_eq!(first.previous, None);
        assert_eq!(titled(&first.next), Some("p1"));

        let last = locate_neighbors(&index, Path::new("/c/p4.md"));
        assert_eq!(titled(&last.previous), Some("p3"));
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_neighbors_not_indexed() {
        let index = index_of(5);
        assert_eq!(
            locate_neighbors(&index, Path::new("/c/missing.md")),
            Neighbors::default()
        );
    }

    #[test]
    fn test_anchor_directory() {
        assert_eq!(
            anchor_directory(Path::new("/site/content/posts/a.md")),
            PathBuf::from("/site/content/posts")
        );
    }
}
