//! Feed generation stage.

use std::path::PathBuf;

use crate::build::feed::build_feed;
use crate::build::index::SiteIndex;
use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError};

/// Finalize stage that writes the RSS feed.
///
/// Only added by the builder when feed generation is enabled and the site
/// has a base URL to build absolute links from.
pub struct FeedStage {
    pub base_url: String,
    /// Output filename relative to the output directory
    pub filename: String,
}

impl FinalizeStage for FeedStage {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn artifact(&self) -> PathBuf {
        PathBuf::from(&self.filename)
    }

    fn finalize(&self, index: &SiteIndex, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let xml = build_feed(ctx.site, &self.base_url, index);

        let output_path = ctx.output_dir.join(&self.filename);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&output_path, xml).map_err(|e| PipelineError::Write {
            path: output_path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
