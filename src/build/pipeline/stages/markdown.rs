//! Markdown rendering stage.

use crate::build::markdown::render_markdown;
use crate::build::pipeline::{PipelineContext, PipelineError, RenderDoc, Stage};

/// Stage that converts the markdown body to an HTML fragment.
///
/// After this stage, `doc.content` contains HTML with highlighted code
/// blocks and anchored headings.
pub struct MarkdownStage;

impl Stage for MarkdownStage {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn process(&self, doc: &mut RenderDoc, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let html = render_markdown(&doc.content, ctx.highlighter, ctx.markdown_config)?;
        doc.content = html;
        Ok(())
    }
}
