//! Template rendering.
//!
//! Wraps Tera and enforces the layout contract: every post resolves to
//! exactly one layout template, and a layout must reference `content`
//! somewhere so the rendered body actually ends up in the page.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use super::date::PostDate;
use super::index::IndexEntry;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("templates directory not found: {0}")]
    TemplatesNotFound(String),

    #[error("layout '{0}' not found in templates directory")]
    LayoutNotFound(String),

    #[error("layout '{0}' is missing the content insertion point")]
    MissingInsertionPoint(String),

    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// The template renderer, wrapping Tera.
pub struct Renderer {
    tera: Tera,
    /// Raw template sources by name, kept for layout contract checks
    sources: HashMap<String, String>,
}

impl Renderer {
    /// Create a new renderer loading templates from the given directory.
    pub fn new(templates_dir: &Path) -> Result<Self, RenderError> {
        if !templates_dir.is_dir() {
            return Err(RenderError::TemplatesNotFound(
                templates_dir.display().to_string(),
            ));
        }

        let glob = templates_dir.join("**/*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;

        let mut sources = HashMap::new();
        collect_sources(templates_dir, String::new(), &mut sources)?;

        Ok(Self { tera, sources })
    }

    /// Resolve a layout name to its template, checking the layout contract.
    fn layout_template(&self, layout: &str) -> Result<String, RenderError> {
        let name = format!("{layout}.html");
        let source = self
            .sources
            .get(&name)
            .ok_or_else(|| RenderError::LayoutNotFound(layout.to_string()))?;

        if !has_insertion_point(source) {
            return Err(RenderError::MissingInsertionPoint(layout.to_string()));
        }

        Ok(name)
    }

    /// Render a post body through its layout.
    pub fn render_post(&self, layout: &str, context: &PageContext) -> Result<String, RenderError> {
        let template = self.layout_template(layout)?;

        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("page", &context.page);
        tera_context.insert("content", &context.content);
        tera_context.insert("theme", &context.theme);
        tera_context.insert("folio", &context.folio);

        Ok(self.tera.render(&template, &tera_context)?)
    }

    /// Render the site index page.
    pub fn render_index(&self, context: &IndexContext) -> Result<String, RenderError> {
        if !self.sources.contains_key("index.html") {
            return Err(RenderError::LayoutNotFound("index".to_string()));
        }

        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("posts", &context.posts);
        tera_context.insert("theme", &context.theme);
        tera_context.insert("folio", &context.folio);

        Ok(self.tera.render("index.html", &tera_context)?)
    }
}

/// True if the template references the rendered body.
///
/// Covers both `{{ content }}` and `{{content}}` spellings, with or
/// without filters.
fn has_insertion_point(source: &str) -> bool {
    source.contains("{{ content") || source.contains("{{content")
}

/// Collect raw template sources, keyed by Tera-style relative name.
fn collect_sources(
    dir: &Path,
    prefix: String,
    sources: &mut HashMap<String, String>,
) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RenderError::ReadTemplate {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if path.is_dir() {
            let nested = if prefix.is_empty() {
                format!("{name}/")
            } else {
                format!("{prefix}{name}/")
            };
            collect_sources(&path, nested, sources)?;
        } else if path.extension().is_some_and(|e| e == "html") {
            let source =
                std::fs::read_to_string(&path).map_err(|e| RenderError::ReadTemplate {
                    path: path.clone(),
                    source: e,
                })?;
            sources.insert(format!("{prefix}{name}"), source);
        }
    }

    Ok(())
}

// =============================================================================
// Template contexts
// =============================================================================

/// Context passed to post layouts.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteContext,
    pub page: PageInfo,
    pub content: String,
    /// Theme settings from config, accessible as `theme.*` in templates
    pub theme: serde_json::Value,
    /// Generator context, accessible as `folio.*` in templates
    pub folio: FolioContext,
}

/// Context passed to the index template.
#[derive(Debug, Serialize)]
pub struct IndexContext<'a> {
    pub site: &'a SiteContext,
    pub posts: &'a [IndexEntry],
    pub theme: &'a serde_json::Value,
    pub folio: &'a FolioContext,
}

/// Information about the generator itself, for template conditionals
/// (e.g. only emit the live-reload script in dev mode).
#[derive(Debug, Clone, Serialize)]
pub struct FolioContext {
    pub dev: bool,
    pub live_reload: bool,
    pub version: String,
}

impl Default for FolioContext {
    fn default() -> Self {
        Self {
            dev: false,
            live_reload: false,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Site-level information.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// Information about the current post.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub date: PostDate,
    pub tags: Vec<String>,
    pub description: Option<String>,
    /// Custom front matter fields (flattened, e.g. `page.series`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}
