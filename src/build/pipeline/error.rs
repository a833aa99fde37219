//! Pipeline error types.

use std::path::PathBuf;

use crate::build::markdown::MarkdownError;
use crate::build::render::RenderError;

/// Errors that can occur while processing a single document or finalizing
/// the build.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("markdown rendering error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
