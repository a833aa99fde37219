use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::{slugify, title_case};

use super::date::PostDate;
use super::paths::post_url;

// =============================================================================
// Content items (posts and static files)
// =============================================================================

/// A content item discovered in the content directory.
/// Either a post (markdown, rendered to HTML) or a static file (copied as-is).
#[derive(Debug, Clone)]
pub enum ContentItem {
    Post(Document),
    Static(StaticFile),
}

/// A static file (image, CSS, etc.) that gets copied to the output directory
/// under the same relative path.
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Path relative to the content root (e.g., "images/diagram.png")
    pub source_path: PathBuf,
    /// The URL path this file will be served at (e.g., "/images/diagram.png")
    pub url_path: String,
}

// =============================================================================
// Documents
// =============================================================================

/// A post loaded from the content directory.
///
/// Immutable once loaded; the pipeline carries rendering state separately.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the content root (e.g., "functional-error-handling.md")
    pub source_path: PathBuf,
    /// URL-safe identifier, from front matter or the file stem
    pub slug: String,
    /// The URL path this post will be served at (e.g., "/2024/06/functional-error-handling")
    pub url_path: String,
    /// Front matter metadata
    pub front_matter: FrontMatter,
    /// The markdown body, without the front matter block
    pub raw_content: String,
}

impl Document {
    /// Create a document from a parsed source file.
    ///
    /// The slug comes from the front matter override if present, otherwise
    /// from the slugified file stem. The URL is derived from the publication
    /// date and the slug.
    pub fn new(source_path: PathBuf, front_matter: FrontMatter, raw_content: String) -> Self {
        let slug = front_matter.slug.clone().unwrap_or_else(|| {
            source_path
                .file_stem()
                .map(|s| slugify(&s.to_string_lossy()))
                .unwrap_or_default()
        });
        let url_path = post_url(front_matter.date, &slug);

        Self {
            source_path,
            slug,
            url_path,
            front_matter,
            raw_content,
        }
    }

    /// Get the post title, falling back to the title-cased file stem.
    pub fn title(&self) -> String {
        self.front_matter.title.clone().unwrap_or_else(|| {
            self.source_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(title_case)
                .unwrap_or_else(|| "Untitled".to_string())
        })
    }

    pub fn date(&self) -> PostDate {
        self.front_matter.date
    }
}

// =============================================================================
// Front matter
// =============================================================================

/// Front matter metadata parsed from a post.
///
/// `date` is the only required field; everything else has a sensible
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Post title (overrides the filename-derived title)
    pub title: Option<String>,
    /// Publication date, `YYYY-MM-DD` or RFC 3339
    pub date: PostDate,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Custom slug override
    pub slug: Option<String>,
    /// Short description for the index and feed
    pub description: Option<String>,
    /// Layout template name (defaults to the configured layout)
    pub layout: Option<String>,
    /// Drafts are skipped by the build
    #[serde(default)]
    pub draft: bool,
    /// Additional arbitrary metadata (available in templates, e.g. `page.series`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("no front matter block (posts start with a '---' delimited YAML header)")]
    MissingBlock,

    #[error("front matter block is never closed by a '---' line")]
    Unterminated,

    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result of splitting a post into front matter and body.
#[derive(Debug)]
pub struct ParsedContent {
    pub front_matter: FrontMatter,
    /// The markdown body without the front matter block
    pub content: String,
}

/// Parse the front matter block from post source.
///
/// Front matter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// title: Parse, Don't Validate
/// date: 2024-06-15
/// tags: [types, error-handling]
/// ---
///
/// Body starts here.
/// ```
///
/// A missing or malformed block is an error; a post without a valid `date`
/// cannot be placed in the site index.
pub fn parse_front_matter(content: &str) -> Result<ParsedContent, FrontMatterError> {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return Err(FrontMatterError::MissingBlock);
    }

    let after_opening = &content[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        return Err(FrontMatterError::Unterminated);
    };

    let yaml_block = after_opening[..closing_pos].trim_start_matches('\n');
    let front_matter: FrontMatter = serde_yaml::from_str(yaml_block)?;

    // Skip past "---" + yaml + "\n---"
    let body_start = 3 + closing_pos + 4;
    let body = if body_start < content.len() {
        content[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    Ok(ParsedContent {
        front_matter,
        content: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter_basic() {
        let content = r#"---
title: Functional Error Handling
date: 2024-06-15
tags:
  - errors
  - design
---

# Why exceptions compose poorly
"#;
        let parsed = parse_front_matter(content).unwrap();
        assert_eq!(
            parsed.front_matter.title,
            Some("Functional Error Handling".to_string())
        );
        assert_eq!(parsed.front_matter.tags, vec!["errors", "design"]);
        assert_eq!(parsed.content.trim(), "# Why exceptions compose poorly");
    }

    #[test]
    fn test_parse_front_matter_missing_date() {
        let content = "---\ntitle: No Date\n---\n\nBody\n";
        let err = parse_front_matter(content).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_parse_front_matter_malformed_date() {
        let content = "---\ntitle: Bad Date\ndate: yesterday-ish\n---\n\nBody\n";
        assert!(matches!(
            parse_front_matter(content),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_front_matter_missing_block() {
        let content = "# Just Markdown\n\nNo front matter here.";
        assert!(matches!(
            parse_front_matter(content),
            Err(FrontMatterError::MissingBlock)
        ));
    }

    #[test]
    fn test_parse_front_matter_unterminated() {
        let content = "---\ntitle: Oops\ndate: 2024-01-01\n\nBody without closing fence\n";
        assert!(matches!(
            parse_front_matter(content),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn test_parse_front_matter_extra_fields() {
        let content = "---\ndate: 2024-01-01\nseries: di-pitfalls\n---\n\nBody\n";
        let parsed = parse_front_matter(content).unwrap();
        assert!(parsed.front_matter.extra.contains_key("series"));
    }

    #[test]
    fn test_document_slug_from_file_stem() {
        let parsed = parse_front_matter("---\ndate: 2024-06-15\n---\nBody").unwrap();
        let doc = Document::new(
            PathBuf::from("Dependency Injection Pitfalls.md"),
            parsed.front_matter,
            parsed.content,
        );
        assert_eq!(doc.slug, "dependency-injection-pitfalls");
        assert_eq!(doc.url_path, "/2024/06/dependency-injection-pitfalls");
    }

    #[test]
    fn test_document_slug_override() {
        let parsed =
            parse_front_matter("---\ndate: 2024-06-15\nslug: di-pitfalls\n---\nBody").unwrap();
        let doc = Document::new(
            PathBuf::from("dependency-injection-pitfalls.md"),
            parsed.front_matter,
            parsed.content,
        );
        assert_eq!(doc.slug, "di-pitfalls");
    }

    #[test]
    fn test_document_title_fallback() {
        let parsed = parse_front_matter("---\ndate: 2024-06-15\n---\nBody").unwrap();
        let doc = Document::new(
            PathBuf::from("functional-error-handling.md"),
            parsed.front_matter,
            parsed.content,
        );
        assert_eq!(doc.title(), "Functional Error Handling");
    }
}
