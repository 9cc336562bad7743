//! Route to file resolution.
//!
//! Named files (configuration, plugin directories, not-found pages) are looked
//! up nearest-first: starting at the directory matching the full request path
//! and climbing one segment at a time to the document root, then falling back
//! to the site root. A file close to the requested route shadows one higher up.

use std::path::{Path, PathBuf};

use crate::util::{join_normalized, path_str};

/// The request-derived locations resolution works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPaths {
    /// Directory request paths are mapped onto (the content directory)
    pub document_root: PathBuf,
    /// Last-resort lookup directory (the site root)
    pub script_dir: PathBuf,
    /// Raw request path, possibly with a query string
    pub request_uri: String,
}

impl RequestPaths {
    pub fn new(
        document_root: impl AsRef<Path>,
        script_dir: impl AsRef<Path>,
        request_uri: impl Into<String>,
    ) -> Self {
        Self {
            document_root: document_root.as_ref().to_path_buf(),
            script_dir: script_dir.as_ref().to_path_buf(),
            request_uri: request_uri.into(),
        }
    }
}

/// Normalize a request path into a route.
///
/// "/posts//hello/?page=2" -> "/posts/hello"
/// "/posts/../../secret" -> "/secret"
/// "" -> "/"
pub fn normalize_route(uri: &str) -> String {
    format!("/{}", route_segments(strip_query(uri)).join("/"))
}

/// Path segments with `.` dropped and `..` applied, never climbing above the
/// root.
fn route_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    segments
}

fn strip_query(uri: &str) -> &str {
    uri.split_once('?').map_or(uri, |(path, _)| path)
}

/// Resolves files relative to a single request.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    paths: RequestPaths,
}

impl ContentResolver {
    pub fn new(paths: RequestPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &RequestPaths {
        &self.paths
    }

    /// The nearest existing `filename`, if any.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        self.candidates(filename).into_iter().find(|p| p.exists())
    }

    /// Every existing `filename` along the cascade, nearest first.
    pub fn resolve_all(&self, filename: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        for candidate in self.candidates(filename) {
            if candidate.exists() && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        found
    }

    /// The content file for `route`.
    ///
    /// A route naming a directory maps to its `index` document; anything else
    /// gets the content extension appended. The file may not exist, but it
    /// always lies under the document root.
    pub fn resolve_page(&self, route: &str, ext: &str) -> PathBuf {
        let base = path_str(&self.paths.document_root);
        let path = join_normalized(&[&base, &route_segments(route).join("/")]);
        if path.is_dir() {
            path.join(format!("index{ext}"))
        } else {
            PathBuf::from(format!("{}{ext}", path_str(&path).trim_end_matches('/')))
        }
    }

    /// The request path without its query string.
    pub fn current_uri(&self) -> &str {
        strip_query(&self.paths.request_uri)
    }

    /// The last segment of the request path.
    pub fn current_file(&self) -> &str {
        self.current_uri().rsplit('/').next().unwrap_or("")
    }

    /// The directory the request is served from.
    ///
    /// "/posts/" -> `<root>/posts`, "/posts/hello" -> `<root>/posts`
    pub fn current_dir(&self) -> PathBuf {
        let root = path_str(&self.paths.document_root);
        let uri = self.current_uri();
        let mut segments = route_segments(uri);
        if !uri.ends_with('/') {
            segments.pop();
        }
        let dir = join_normalized(&[&root, &segments.join("/")]);
        PathBuf::from(path_str(&dir).trim_end_matches('/'))
    }

    /// Candidate locations for `filename`, nearest first.
    fn candidates(&self, filename: &str) -> Vec<PathBuf> {
        let root = path_str(&self.paths.document_root);
        let segments = route_segments(self.current_uri());

        let mut candidates = Vec::with_capacity(segments.len() + 2);
        for depth in (0..=segments.len()).rev() {
            let prefix = segments[..depth].join("/");
            candidates.push(join_normalized(&[&root, &prefix, filename]));
        }
        candidates.push(join_normalized(&[&path_str(&self.paths.script_dir), filename]));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Site {
        _dir: tempfile::TempDir,
        root: PathBuf,
        content: PathBuf,
    }

    fn site() -> Site {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let content = root.join("content");
        std::fs::create_dir_all(content.join("a/b/c")).unwrap();
        Site {
            _dir: dir,
            root,
            content,
        }
    }

    fn resolver(site: &Site, uri: &str) -> ContentResolver {
        ContentResolver::new(RequestPaths::new(&site.content, &site.root, uri))
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("/posts//hello/?page=2"), "/posts/hello");
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("about"), "/about");
    }

    #[test]
    fn test_normalize_route_dot_segments() {
        assert_eq!(normalize_route("/a/./b/../c"), "/a/c");
        assert_eq!(normalize_route("/../secret"), "/secret");
        assert_eq!(normalize_route("/a/../../../etc/passwd"), "/etc/passwd");
        assert_eq!(normalize_route("/.."), "/");
    }

    #[test]
    fn test_resolve_page_stays_under_document_root() {
        let site = site();
        let resolver = resolver(&site, "/");
        assert_eq!(
            resolver.resolve_page("/../secret", ".md"),
            site.content.join("secret.md")
        );
        assert_eq!(
            resolver.resolve_page("/a/../../..", ".md"),
            site.content.join("index.md")
        );
        assert_eq!(
            resolver.resolve_page("/a/./b/../note", ".md"),
            site.content.join("a/note.md")
        );
    }

    #[test]
    fn test_resolve_does_not_climb_out_of_document_root() {
        let site = site();
        std::fs::create_dir_all(site.root.join("outside")).unwrap();
        std::fs::write(site.root.join("outside/config"), "outside").unwrap();

        let resolver = resolver(&site, "/../outside/x");
        for candidate in resolver.candidates("config") {
            assert!(!candidate.starts_with(site.root.join("outside")), "{candidate:?}");
        }
        assert!(resolver.resolve("config").is_none());
        assert_eq!(resolver.current_dir(), site.content.join("outside"));
    }

    #[test]
    fn test_resolve_nearest_ancestor_wins() {
        let site = site();
        std::fs::write(site.content.join("a/config"), "a").unwrap();
        std::fs::write(site.content.join("config"), "root").unwrap();

        let found = resolver(&site, "/a/b/c").resolve("config").unwrap();
        assert_eq!(found, site.content.join("a/config"));
    }

    #[test]
    fn test_resolve_falls_back_to_script_dir() {
        let site = site();
        std::fs::write(site.root.join("config"), "site").unwrap();

        let found = resolver(&site, "/a/b").resolve("config").unwrap();
        assert_eq!(found, site.root.join("config"));
    }

    #[test]
    fn test_resolve_root_request() {
        let site = site();
        std::fs::write(site.root.join("config"), "site").unwrap();

        let resolver = resolver(&site, "/");
        assert_eq!(resolver.candidates("config").len(), 2);
        assert_eq!(resolver.resolve("config").unwrap(), site.root.join("config"));
    }

    #[test]
    fn test_resolve_ignores_query_string() {
        let site = site();
        std::fs::write(site.content.join("a/b/config"), "b").unwrap();

        let found = resolver(&site, "/a/b?x=/a/b/c").resolve("config").unwrap();
        assert_eq!(found, site.content.join("a/b/config"));
    }

    #[test]
    fn test_resolve_missing() {
        let site = site();
        assert!(resolver(&site, "/a").resolve("nothing-here").is_none());
    }

    #[test]
    fn test_resolve_all_nearest_first() {
        let site = site();
        std::fs::write(site.content.join("a/b/config"), "b").unwrap();
        std::fs::write(site.content.join("config"), "root").unwrap();
        std::fs::write(site.root.join("config"), "site").unwrap();

        let found = resolver(&site, "/a/b/c").resolve_all("config");
        assert_eq!(
            found,
            vec![
                site.content.join("a/b/config"),
                site.content.join("config"),
                site.root.join("config"),
            ]
        );
    }

    #[test]
    fn test_resolve_all_deduplicates() {
        let site = site();
        std::fs::write(site.content.join("config"), "root").unwrap();

        // The document root doubles as the script directory
        let resolver = ContentResolver::new(RequestPaths::new(&site.content, &site.content, "/a"));
        assert_eq!(resolver.resolve_all("config"), vec![site.content.join("config")]);
    }

    #[test]
    fn test_resolve_page_directory_index() {
        let site = site();
        std::fs::create_dir_all(site.content.join("posts")).unwrap();

        let resolver = resolver(&site, "/posts");
        assert_eq!(
            resolver.resolve_page("/posts", ".md"),
            site.content.join("posts/index.md")
        );
        assert_eq!(
            resolver.resolve_page("/posts/", ".md"),
            site.content.join("posts/index.md")
        );
    }

    #[test]
    fn test_resolve_page_file() {
        let site = site();
        let resolver = resolver(&site, "/posts");
        assert_eq!(resolver.resolve_page("/posts", ".md"), site.content.join("posts.md"));
        assert_eq!(
            resolver.resolve_page("/a/b/note", ".md"),
            site.content.join("a/b/note.md")
        );
    }

    #[test]
    fn test_resolve_page_root() {
        let site = site();
        let resolver = resolver(&site, "/");
        assert_eq!(resolver.resolve_page("/", ".md"), site.content.join("index.md"));
    }

    #[test]
    fn test_current_paths() {
        let site = site();
        let file = resolver(&site, "/a/b?draft=1");
        assert_eq!(file.current_uri(), "/a/b");
        assert_eq!(file.current_file(), "b");
        assert_eq!(file.current_dir(), site.content.join("a"));

        let dir = resolver(&site, "/a/b/");
        assert_eq!(dir.current_dir(), site.content.join("a/b"));

        let root = resolver(&site, "/");
        assert_eq!(root.current_dir(), site.content);
    }
}
