//! Build pipeline for post processing.
//!
//! The pipeline transforms posts through a series of stages:
//! 1. Markdown rendering (to an HTML fragment, with syntax highlighting)
//! 2. Layout rendering (wrap the fragment in the post's layout template)
//! 3. File writing (output to disk)
//!
//! Stages operate on one document at a time, so a failure takes only that
//! document out of the run; everything else keeps going and the failure is
//! reported at the end. Documents render in parallel across rayon workers;
//! each render reads only its own document plus the shared read-only
//! context.
//!
//! Build-wide artifacts (the site index, the feed) are finalize stages and
//! run once, serially, after the per-document pass.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::RenderDoc;
pub use error::PipelineError;
pub use stages::{FeedStage, IndexStage};

use std::path::PathBuf;

use rayon::prelude::*;

use stages::{LayoutStage, MarkdownStage, WriteStage};

use super::index::SiteIndex;

/// A stage in the document processing pipeline.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used in failure reports).
    fn name(&self) -> &'static str;

    /// Process a single document.
    ///
    /// Runs on a worker thread; shared resources come in through the
    /// read-only context.
    fn process(&self, doc: &mut RenderDoc, ctx: &PipelineContext) -> Result<(), PipelineError>;
}

/// A stage that runs once after all documents are processed.
///
/// Use this for build-wide artifacts like the site index or the feed.
pub trait FinalizeStage: Send + Sync {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Output artifact this stage writes, relative to the output root.
    fn artifact(&self) -> PathBuf;

    /// Run finalization over the index of successfully rendered posts.
    fn finalize(&self, index: &SiteIndex, ctx: &PipelineContext) -> Result<(), PipelineError>;
}

/// A per-document failure, collected for the end-of-run report.
#[derive(Debug)]
pub struct StageFailure {
    /// Source path relative to the content root
    pub source_path: PathBuf,
    /// Which stage failed
    pub stage: &'static str,
    pub error: PipelineError,
}

/// A failed finalize stage, collected for the end-of-run report.
#[derive(Debug)]
pub struct FinalizeFailure {
    /// The artifact the stage would have written
    pub artifact: PathBuf,
    pub stage: &'static str,
    pub error: PipelineError,
}

/// The result of running the per-document stages.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Documents that made it through every stage
    pub rendered: Vec<RenderDoc>,
    pub failures: Vec<StageFailure>,
}

/// The document processing pipeline.
///
/// The default pipeline is markdown → layout → write; finalize stages are
/// added by the builder depending on configuration.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    finalize_stages: Vec<Box<dyn FinalizeStage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        }
    }

    /// Create the default pipeline with the standard document stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(MarkdownStage);
        pipeline.add_stage(LayoutStage);
        pipeline.add_stage(WriteStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a finalize stage (runs after all documents are processed).
    pub fn add_finalize_stage<S: FinalizeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.finalize_stages.push(Box::new(stage));
        self
    }

    /// Run the per-document stages over a batch.
    ///
    /// Documents are processed in parallel. A document that fails a stage
    /// skips its remaining stages and lands in `failures`; input order is
    /// preserved for the survivors.
    pub fn run(&self, docs: Vec<RenderDoc>, ctx: &PipelineContext) -> PipelineOutcome {
        let results: Vec<Result<RenderDoc, StageFailure>> = docs
            .into_par_iter()
            .map(|mut doc| {
                for stage in &self.stages {
                    if let Err(error) = stage.process(&mut doc, ctx) {
                        return Err(StageFailure {
                            source_path: doc.doc.source_path.clone(),
                            stage: stage.name(),
                            error,
                        });
                    }
                }
                Ok(doc)
            })
            .collect();

        let mut outcome = PipelineOutcome {
            rendered: Vec::new(),
            failures: Vec::new(),
        };
        for result in results {
            match result {
                Ok(doc) => outcome.rendered.push(doc),
                Err(failure) => outcome.failures.push(failure),
            }
        }
        outcome
    }

    /// Run the finalize stages over the index of rendered posts.
    ///
    /// A failed stage is recorded and the remaining stages still run; a
    /// broken index never blocks the feed or vice versa.
    pub fn finalize(&self, index: &SiteIndex, ctx: &PipelineContext) -> Vec<FinalizeFailure> {
        let mut failures = Vec::new();
        for stage in &self.finalize_stages {
            if let Err(error) = stage.finalize(index, ctx) {
                failures.push(FinalizeFailure {
                    artifact: stage.artifact(),
                    stage: stage.name(),
                    error,
                });
            }
        }
        failures
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
