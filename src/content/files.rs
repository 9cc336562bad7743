use std::path::{Path, PathBuf};

/// List the files under `dir` whose name contains `ext`.
///
/// Hidden entries are skipped. Subdirectories are only descended into when
/// `recursive` is set. A missing or unreadable directory yields nothing.
pub fn find_files(dir: &Path, ext: &str, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if name.contains(ext) {
                files.push(path);
            }
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("posts/2024")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join("index.md"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        std::fs::write(root.join(".draft.md"), "").unwrap();
        std::fs::write(root.join(".git/HEAD.md"), "").unwrap();
        std::fs::write(root.join("posts/first.md"), "").unwrap();
        std::fs::write(root.join("posts/2024/second.md"), "").unwrap();
        dir
    }

    fn sorted(mut files: Vec<PathBuf>) -> Vec<PathBuf> {
        files.sort();
        files
    }

    #[test]
    fn test_find_files_recursive() {
        let dir = tree();
        let root = dir.path();
        assert_eq!(
            sorted(find_files(root, ".md", true)),
            vec![
                root.join("index.md"),
                root.join("posts/2024/second.md"),
                root.join("posts/first.md"),
            ]
        );
    }

    #[test]
    fn test_find_files_flat() {
        let dir = tree();
        let root = dir.path();
        assert_eq!(find_files(root, ".md", false), vec![root.join("index.md")]);
    }

    #[test]
    fn test_find_files_matches_backup_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md~"), "").unwrap();
        assert_eq!(find_files(dir.path(), ".md", false).len(), 1);
    }

    #[test]
    fn test_find_files_missing_dir() {
        assert!(find_files(Path::new("/definitely/not/here"), ".md", true).is_empty());
    }
}
