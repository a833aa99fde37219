//! Site index stage.
//!
//! Renders the index page listing every successfully rendered post,
//! newest first.

use std::path::PathBuf;

use crate::build::index::SiteIndex;
use crate::build::paths::url_to_output_path;
use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError};
use crate::build::render::IndexContext;

/// Finalize stage that writes `index.html` at the site root.
pub struct IndexStage;

impl FinalizeStage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn artifact(&self) -> PathBuf {
        PathBuf::from("index.html")
    }

    fn finalize(&self, index: &SiteIndex, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let html = ctx.renderer.render_index(&IndexContext {
            site: ctx.site,
            posts: index.entries(),
            theme: ctx.theme_settings,
            folio: &ctx.folio,
        })?;

        let output_path = url_to_output_path("/", ctx.output_dir);
        std::fs::write(&output_path, html).map_err(|e| PipelineError::Write {
            path: output_path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
