//! Layout rendering stage.
//!
//! Wraps the rendered HTML fragment in the post's layout template,
//! producing the complete page.

use crate::build::pipeline::{PipelineContext, PipelineError, RenderDoc, Stage};
use crate::build::render::{PageContext, PageInfo};

/// Stage that applies the layout template to rendered content.
///
/// After this stage, `doc.output_html` contains the complete HTML page.
pub struct LayoutStage;

impl Stage for LayoutStage {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn process(&self, doc: &mut RenderDoc, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let page_info = PageInfo {
            title: doc.title(),
            url: doc.doc.url_path.clone(),
            date: doc.doc.date(),
            tags: doc.doc.front_matter.tags.clone(),
            description: doc.doc.front_matter.description.clone(),
            extra: doc.doc.front_matter.extra.clone(),
        };

        let page_context = PageContext {
            site: ctx.site.clone(),
            page: page_info,
            content: doc.content.clone(),
            theme: ctx.theme_settings.clone(),
            folio: ctx.folio.clone(),
        };

        let layout = ctx.layout_for(&doc.doc);
        let html = ctx.renderer.render_post(layout, &page_context)?;

        doc.output_html = Some(html);
        Ok(())
    }
}
