//! Pipeline context shared across stages.

use std::path::Path;

use crate::build::document::Document;
use crate::build::highlight::SyntaxHighlighter;
use crate::build::render::{FolioContext, Renderer, SiteContext};
use crate::config::MarkdownConfig;

/// Read-only context available to every stage.
///
/// Stages run concurrently across documents, so everything in here is
/// shared by reference and never mutated during a run.
pub struct PipelineContext<'a> {
    /// Directory where output files are written
    pub output_dir: &'a Path,

    /// Site metadata (title, URL, description, author)
    pub site: &'a SiteContext,

    /// Theme settings passed to templates
    pub theme_settings: &'a serde_json::Value,

    /// Markdown processing configuration
    pub markdown_config: &'a MarkdownConfig,

    /// Layout used when a post doesn't name one
    pub default_layout: &'a str,

    /// Syntax highlighter for code blocks
    pub highlighter: &'a SyntaxHighlighter,

    /// Template renderer
    pub renderer: &'a Renderer,

    /// Generator context (dev mode, live reload, version)
    pub folio: FolioContext,
}

impl<'a> PipelineContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        output_dir: &'a Path,
        site: &'a SiteContext,
        theme_settings: &'a serde_json::Value,
        markdown_config: &'a MarkdownConfig,
        default_layout: &'a str,
        highlighter: &'a SyntaxHighlighter,
        renderer: &'a Renderer,
        dev_mode: bool,
        live_reload: bool,
    ) -> Self {
        Self {
            output_dir,
            site,
            theme_settings,
            markdown_config,
            default_layout,
            highlighter,
            renderer,
            folio: FolioContext {
                dev: dev_mode,
                live_reload: dev_mode && live_reload,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Resolve the layout for a document.
    pub fn layout_for<'d>(&'d self, doc: &'d Document) -> &'d str {
        doc.front_matter.layout.as_deref().unwrap_or(self.default_layout)
    }
}
