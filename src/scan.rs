//! Recursive content discovery.
//!
//! Walks a content directory depth-first and returns every file as a
//! [content path](crate::order): relative to the walked root, `/`-separated,
//! with no leading prefix.
//!
//! ```text
//! blog/                      scan("blog")
//! ├── 2023/
//! │   ├── 1.md          →    2023/1.md
//! │   └── 2.md          →    2023/2.md
//! ├── .git/                  (excluded)
//! └── index.md          →    index.md
//! ```
//!
//! Entries are visited in file-name order so repeated scans of an unchanged
//! tree give the same list. A missing or non-directory root is an error the
//! caller has to handle; a single unreadable entry below the root is logged
//! and skipped.

use crate::log;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("content directory not found: {0}")]
    Missing(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What to include in a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Directory names skipped at any depth (e.g. `.git`).
    pub exclude_dirs: Vec<String>,
    /// Exact, case-sensitive file-name suffix such as `.md`.
    pub extension: Option<String>,
}

impl ScanOptions {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn excluding<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclude_dirs
                .iter()
                .any(|d| entry.file_name().to_string_lossy() == d.as_str())
    }

    fn accepts(&self, rel_path: &str) -> bool {
        match &self.extension {
            Some(ext) => rel_path.ends_with(ext.as_str()),
            None => true,
        }
    }
}

/// List every file under `root` as a relative, `/`-separated path.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<String>, ScanError> {
    match root.metadata() {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(ScanError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::Missing(root.to_path_buf()));
        }
        Err(e) => {
            return Err(ScanError::Unreadable {
                path: root.to_path_buf(),
                source: e,
            });
        }
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !options.is_excluded(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Unreadable {
                    path: root.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                log!("warn"; "skipping entry under {}: {e}", root.display());
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(rel_path) = content_path(root, entry.path()) else {
            continue;
        };
        if options.accepts(&rel_path) {
            files.push(rel_path);
        }
    }

    Ok(files)
}

/// Normalise `path` to a `/`-separated path relative to `root`.
pub fn content_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined.replace('\\', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn blog_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "2023/1.md", "one");
        write_file(tmp.path(), "2023/2.md", "two");
        write_file(tmp.path(), "2023/cover.png", "png");
        write_file(tmp.path(), "index.md", "home");
        write_file(tmp.path(), ".git/HEAD", "ref");
        write_file(tmp.path(), "drafts/.git/config", "x");
        tmp
    }

    #[test]
    fn lists_all_files_relative_to_root() {
        let tmp = blog_tree();
        let files = scan(tmp.path(), &ScanOptions::default()).unwrap();

        assert!(files.contains(&"2023/1.md".to_string()));
        assert!(files.contains(&"index.md".to_string()));
        assert!(files.contains(&".git/HEAD".to_string()));
        assert!(files.iter().all(|f| !f.contains('\\')));
        assert!(files.iter().all(|f| !f.starts_with('/')));
    }

    #[test]
    fn excluded_directories_are_skipped_at_any_depth() {
        let tmp = blog_tree();
        let options = ScanOptions::default().excluding([".git"]);
        let files = scan(tmp.path(), &options).unwrap();

        assert!(files.iter().all(|f| !f.contains(".git")));
        assert_eq!(files.len(), 4);
    }

    #[test]
    fn extension_filter_is_exact_suffix() {
        let tmp = blog_tree();
        write_file(tmp.path(), "2023/3.MD", "upper");
        let options = ScanOptions::default()
            .excluding([".git"])
            .with_extension(".md");
        let files = scan(tmp.path(), &options).unwrap();

        assert_eq!(files, vec!["2023/1.md", "2023/2.md", "index.md"]);
    }

    #[test]
    fn visits_in_file_name_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.md", "");
        write_file(tmp.path(), "a/z.md", "");
        write_file(tmp.path(), "a/y.md", "");
        let files = scan(tmp.path(), &ScanOptions::default()).unwrap();

        assert_eq!(files, vec!["a/y.md", "a/z.md", "b.md"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &ScanOptions::default());
        assert!(matches!(result, Err(ScanError::Missing(_))));
    }

    #[test]
    fn file_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "file.md", "");
        let result = scan(&tmp.path().join("file.md"), &ScanOptions::default());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn empty_directory_scans_to_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(tmp.path(), &ScanOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn content_path_joins_with_forward_slashes() {
        let root = Path::new("/site/blog");
        let path = root.join("2024").join("3.md");
        assert_eq!(content_path(root, &path).as_deref(), Some("2024/3.md"));
        assert_eq!(content_path(root, root), None);
    }
}
