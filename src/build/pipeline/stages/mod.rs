//! Default pipeline stages.
//!
//! Per-document stages:
//!
//! 1. **MarkdownStage** - Convert markdown to HTML with syntax highlighting
//! 2. **LayoutStage** - Wrap the HTML fragment in the post's layout
//! 3. **WriteStage** - Write the final page to the output directory
//!
//! Finalize stages, added by the builder:
//!
//! - **IndexStage** - Render the site index page
//! - **FeedStage** - Write the RSS feed

mod feed;
mod index;
mod layout;
mod markdown;
mod write;

pub use feed::FeedStage;
pub use index::IndexStage;
pub use layout::LayoutStage;
pub use markdown::MarkdownStage;
pub use write::WriteStage;
