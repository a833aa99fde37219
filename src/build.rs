mod builder;
mod content;
mod date;
mod document;
mod feed;
mod highlight;
mod index;
mod markdown;
mod paths;
pub mod pipeline;
mod render;
mod watch;

pub use builder::{BuildFailure, BuildResult, Builder};
pub use paths::base_path_from_config;
pub use watch::{FileWatcher, PathClassifier, WatchEvent, WatchPaths};
