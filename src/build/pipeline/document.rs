//! Document state for pipeline processing.

use crate::build::document::Document;

/// A post being processed through the pipeline.
///
/// Wraps the loaded `Document` with the state that evolves through stages:
///
/// 1. Initially: `content` = raw markdown
/// 2. After markdown: `content` = HTML fragment
/// 3. After layout: `output_html` = final page HTML
/// 4. After write: on disk
#[derive(Debug)]
pub struct RenderDoc {
    /// The loaded document (metadata and raw content)
    pub doc: Document,

    /// Content being processed; starts as the raw markdown body.
    pub content: String,

    /// Final HTML output after layout rendering.
    pub output_html: Option<String>,
}

impl RenderDoc {
    pub fn new(doc: Document) -> Self {
        let content = doc.raw_content.clone();
        Self {
            doc,
            content,
            output_html: None,
        }
    }

    /// Get the document's URL path (for output location).
    pub fn url_path(&self) -> &str {
        &self.doc.url_path
    }

    pub fn title(&self) -> String {
        self.doc.title()
    }
}
