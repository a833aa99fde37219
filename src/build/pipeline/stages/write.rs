//! File writing stage.

use crate::build::paths::url_to_output_path;
use crate::build::pipeline::{PipelineContext, PipelineError, RenderDoc, Stage};

/// Stage that writes rendered pages to the output directory.
///
/// Takes the final HTML from `doc.output_html` and writes it to the
/// path derived from the post's URL, creating parent directories as
/// needed.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(&self, doc: &mut RenderDoc, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let html = doc.output_html.as_ref().ok_or_else(|| {
            PipelineError::stage(
                "write",
                format!(
                    "post '{}' has no output HTML (was the layout stage run?)",
                    doc.url_path()
                ),
            )
        })?;

        let output_path = url_to_output_path(doc.url_path(), ctx.output_dir);

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(&output_path, html).map_err(|e| PipelineError::Write {
            path: output_path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
