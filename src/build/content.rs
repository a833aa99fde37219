//! Content loading.
//!
//! Walks the content directory, splitting entries into posts (markdown with
//! front matter) and static files. Front matter problems are reported per
//! file and never abort the walk; only an unreadable content root is fatal.

use std::path::{Path, PathBuf};

use super::document::{ContentItem, Document, FrontMatterError, StaticFile, parse_front_matter};
use super::paths::static_path_to_url;

// =============================================================================
// Errors
// =============================================================================

/// Fatal errors: the content root itself is unusable.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("content directory does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("content path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-file errors: the offending file is skipped, the run continues.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Read(std::io::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
}

/// A skipped file together with the reason, for the end-of-run report.
#[derive(Debug)]
pub struct LoadFailure {
    /// Path relative to the content root
    pub path: PathBuf,
    pub error: LoadError,
}

// =============================================================================
// Content directory
// =============================================================================

/// Everything found in one pass over the content directory.
#[derive(Debug)]
pub struct LoadedContent {
    pub items: Vec<ContentItem>,
    /// Posts skipped because of `draft: true`
    pub drafts: usize,
    pub failures: Vec<LoadFailure>,
}

/// The content root, validated to exist.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    pub fn new(root: PathBuf) -> Result<Self, ContentError> {
        if !root.exists() {
            return Err(ContentError::PathNotFound(root));
        }
        if !root.is_dir() {
            return Err(ContentError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover and load all content.
    ///
    /// Files are visited in sorted path order so repeated runs see the same
    /// sequence regardless of directory-entry ordering.
    pub fn load(&self) -> Result<LoadedContent, ContentError> {
        let mut files = Vec::new();
        self.walk(&self.root, &PathBuf::new(), &mut files)?;
        files.sort();

        let mut loaded = LoadedContent {
            items: Vec::new(),
            drafts: 0,
            failures: Vec::new(),
        };

        for relative_path in files {
            let extension = relative_path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());

            match extension.as_deref() {
                Some("md" | "markdown") => match self.load_post(&relative_path) {
                    Ok(Some(doc)) => loaded.items.push(ContentItem::Post(doc)),
                    Ok(None) => loaded.drafts += 1,
                    Err(error) => loaded.failures.push(LoadFailure {
                        path: relative_path,
                        error,
                    }),
                },
                _ => {
                    let url_path = static_path_to_url(&relative_path);
                    loaded.items.push(ContentItem::Static(StaticFile {
                        source_path: relative_path,
                        url_path,
                    }));
                }
            }
        }

        Ok(loaded)
    }

    /// Read and parse a single post. Returns `Ok(None)` for drafts.
    fn load_post(&self, relative_path: &Path) -> Result<Option<Document>, LoadError> {
        let raw = std::fs::read_to_string(self.root.join(relative_path)).map_err(LoadError::Read)?;
        let parsed = parse_front_matter(&raw)?;

        if parsed.front_matter.draft {
            return Ok(None);
        }

        Ok(Some(Document::new(
            relative_path.to_path_buf(),
            parsed.front_matter,
            parsed.content,
        )))
    }

    /// Recursively collect file paths relative to the content root.
    fn walk(
        &self,
        dir: &Path,
        relative_path: &Path,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), ContentError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ContentError::ReadEntry {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();

            // Skip hidden files and directories
            if file_name_str.starts_with('.') {
                continue;
            }

            let item_relative_path = relative_path.join(&file_name);

            if path.is_dir() {
                self.walk(&path, &item_relative_path, files)?;
            } else if path.is_file() {
                files.push(item_relative_path);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_posts_and_static_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "functional-error-handling.md",
            "---\ntitle: Functional Error Handling\ndate: 2024-06-15\n---\n\nBody\n",
        );
        write(tmp.path(), "images/diagram.png", "not-really-a-png");

        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        assert_eq!(loaded.items.len(), 2);
        assert!(loaded.failures.is_empty());

        let post = loaded
            .items
            .iter()
            .find_map(|item| match item {
                ContentItem::Post(doc) => Some(doc),
                _ => None,
            })
            .unwrap();
        assert_eq!(post.slug, "functional-error-handling");

        let asset = loaded
            .items
            .iter()
            .find_map(|item| match item {
                ContentItem::Static(file) => Some(file),
                _ => None,
            })
            .unwrap();
        assert_eq!(asset.url_path, "/images/diagram.png");
    }

    #[test]
    fn test_malformed_post_is_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "good.md",
            "---\ndate: 2024-01-01\n---\n\nFine\n",
        );
        write(tmp.path(), "bad.md", "---\ntitle: No Date\n---\n\nBroken\n");

        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].path, PathBuf::from("bad.md"));
    }

    #[test]
    fn test_drafts_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "wip.md",
            "---\ndate: 2024-01-01\ndraft: true\n---\n\nNot yet\n",
        );

        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        assert!(loaded.items.is_empty());
        assert_eq!(loaded.drafts, 1);
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        assert!(loaded.items.is_empty());
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            ContentDir::new(missing),
            Err(ContentError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), ".obsidian.md", "not a post");
        write(
            tmp.path(),
            "visible.md",
            "---\ndate: 2024-01-01\n---\n\nHi\n",
        );

        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        assert_eq!(loaded.items.len(), 1);
    }

    #[test]
    fn test_files_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["zebra.md", "alpha.md", "middle.md"] {
            write(
                tmp.path(),
                name,
                "---\ndate: 2024-01-01\n---\n\nBody\n",
            );
        }

        let content = ContentDir::new(tmp.path().to_path_buf()).unwrap();
        let loaded = content.load().unwrap();

        let slugs: Vec<_> = loaded
            .items
            .iter()
            .filter_map(|item| match item {
                ContentItem::Post(doc) => Some(doc.slug.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(slugs, vec!["alpha", "middle", "zebra"]);
    }
}
