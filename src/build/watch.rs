//! File watching for automatic rebuilds.
//!
//! Uses `notify-debouncer-full` to watch the content directory, templates,
//! and the config file for changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{
    Config as NotifyConfig, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher,
};
use notify_debouncer_full::{
    DebounceEventResult, Debouncer, RecommendedCache, new_debouncer, new_debouncer_opt,
};

use crate::config::WatchConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

// =============================================================================
// Watch events
// =============================================================================

/// What kind of file changed, for rebuild decisions and reporting.
#[derive(Debug)]
pub enum ChangeKind {
    Post { path: PathBuf, deleted: bool },
    StaticAsset { path: PathBuf, deleted: bool },
    Template { path: PathBuf },
    Config,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Post { path, deleted } => {
                write!(f, "post {}{}", path.display(), deleted_suffix(*deleted))
            }
            ChangeKind::StaticAsset { path, deleted } => {
                write!(f, "asset {}{}", path.display(), deleted_suffix(*deleted))
            }
            ChangeKind::Template { path } => write!(f, "template {}", path.display()),
            ChangeKind::Config => write!(f, "config"),
        }
    }
}

fn deleted_suffix(deleted: bool) -> &'static str {
    if deleted { " (deleted)" } else { "" }
}

/// Events sent from the file watcher.
#[derive(Debug)]
pub enum WatchEvent {
    /// Files changed, rebuild needed.
    FilesChanged(Vec<ChangeKind>),
    /// Watcher error occurred.
    Error(String),
}

// =============================================================================
// Path classification
// =============================================================================

/// Paths to watch for changes.
pub struct WatchPaths {
    /// The content directory.
    pub content_dir: PathBuf,
    /// The templates directory.
    pub templates_dir: PathBuf,
    /// Config file path.
    pub config_path: PathBuf,
}

/// Classifies file paths into change types.
#[derive(Clone)]
pub struct PathClassifier {
    content_dir: PathBuf,
    templates_dir: PathBuf,
    config_path: PathBuf,
}

impl PathClassifier {
    pub fn new(content_dir: PathBuf, templates_dir: PathBuf, config_path: PathBuf) -> Self {
        Self {
            content_dir,
            templates_dir,
            config_path,
        }
    }

    /// Classify a changed path into a ChangeKind.
    pub fn classify(&self, path: &Path, deleted: bool) -> Option<ChangeKind> {
        // Skip hidden files and directories
        if path
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            return None;
        }

        if path == self.config_path {
            return Some(ChangeKind::Config);
        }

        if path.starts_with(&self.templates_dir) {
            if path.extension().is_some_and(|e| e == "html") {
                return Some(ChangeKind::Template {
                    path: path.to_path_buf(),
                });
            }
            return None;
        }

        if path.starts_with(&self.content_dir) {
            let ext = path.extension().and_then(|e| e.to_str());
            return match ext {
                Some("md") | Some("markdown") => Some(ChangeKind::Post {
                    path: path.to_path_buf(),
                    deleted,
                }),
                _ => Some(ChangeKind::StaticAsset {
                    path: path.to_path_buf(),
                    deleted,
                }),
            };
        }

        None // Unknown path, ignore
    }
}

// =============================================================================
// File watcher
// =============================================================================

/// A file watcher that can use either native or polling backend.
pub enum FileWatcher {
    /// Native file system watcher (recommended for local development).
    Native {
        _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
        rx: Receiver<WatchEvent>,
    },
    /// Polling-based watcher (for network filesystems, Docker, etc.).
    Polling {
        _debouncer: Debouncer<PollWatcher, RecommendedCache>,
        rx: Receiver<WatchEvent>,
    },
}

impl FileWatcher {
    /// Create a new file watcher.
    pub fn new(
        config: &WatchConfig,
        paths: &WatchPaths,
        classifier: PathClassifier,
    ) -> Result<Self, WatchError> {
        let debounce_timeout = Duration::from_millis(config.debounce_ms);

        let (tx, rx) = mpsc::channel();

        // Callback to convert notify events to our WatchEvent type
        let callback = move |result: DebounceEventResult| match result {
            Ok(events) => {
                let changes: Vec<ChangeKind> = events
                    .iter()
                    .filter_map(|event| {
                        let deleted = matches!(event.kind, EventKind::Remove(_));
                        if !is_relevant_event(&event.kind) {
                            return None;
                        }
                        // Classify the first path (usually there's only one)
                        event
                            .paths
                            .first()
                            .and_then(|p| classifier.classify(p, deleted))
                    })
                    .collect();

                if !changes.is_empty() {
                    let _ = tx.send(WatchEvent::FilesChanged(changes));
                }
            }
            Err(errors) => {
                for e in errors {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            }
        };

        if config.poll {
            let poll_interval = Duration::from_millis(config.poll_interval_ms);
            let notify_config = NotifyConfig::default().with_poll_interval(poll_interval);

            let mut debouncer = new_debouncer_opt::<_, PollWatcher, RecommendedCache>(
                debounce_timeout,
                None,
                callback,
                RecommendedCache::default(),
                notify_config,
            )
            .map_err(WatchError::Notify)?;

            add_watch_paths_to_debouncer(&mut debouncer, paths)?;

            Ok(FileWatcher::Polling {
                _debouncer: debouncer,
                rx,
            })
        } else {
            let mut debouncer =
                new_debouncer(debounce_timeout, None, callback).map_err(WatchError::Notify)?;

            add_watch_paths_to_debouncer(&mut debouncer, paths)?;

            Ok(FileWatcher::Native {
                _debouncer: debouncer,
                rx,
            })
        }
    }

    /// Receive the next watch event (blocking).
    pub fn recv(&self) -> Option<WatchEvent> {
        match self {
            FileWatcher::Native { rx, .. } => rx.recv().ok(),
            FileWatcher::Polling { rx, .. } => rx.recv().ok(),
        }
    }
}

/// Add watch paths to a debouncer.
fn add_watch_paths_to_debouncer<W: Watcher, C: notify_debouncer_full::FileIdCache>(
    debouncer: &mut Debouncer<W, C>,
    paths: &WatchPaths,
) -> Result<(), WatchError> {
    if paths.content_dir.exists() {
        debouncer.watch(&paths.content_dir, RecursiveMode::Recursive)?;
    }

    if paths.templates_dir.exists() {
        debouncer.watch(&paths.templates_dir, RecursiveMode::Recursive)?;
    }

    // Watch the config file's parent directory (to catch config changes)
    if let Some(parent) = paths.config_path.parent()
        && parent.exists()
    {
        debouncer.watch(parent, RecursiveMode::NonRecursive)?;
    }

    Ok(())
}

/// Check if an event kind is relevant for rebuilds.
fn is_relevant_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(root: &Path) -> PathClassifier {
        PathClassifier::new(
            root.join("posts"),
            root.join("templates"),
            root.join("folio.yaml"),
        )
    }

    #[test]
    fn test_classify_post() {
        let root = Path::new("/blog");
        let c = classifier(root);

        let kind = c.classify(Path::new("/blog/posts/essay.md"), false);
        assert!(matches!(kind, Some(ChangeKind::Post { deleted: false, .. })));
    }

    #[test]
    fn test_classify_template_and_config() {
        let root = Path::new("/blog");
        let c = classifier(root);

        assert!(matches!(
            c.classify(Path::new("/blog/templates/post.html"), false),
            Some(ChangeKind::Template { .. })
        ));
        assert!(matches!(
            c.classify(Path::new("/blog/folio.yaml"), false),
            Some(ChangeKind::Config)
        ));
    }

    #[test]
    fn test_classify_ignores_hidden_and_unknown() {
        let root = Path::new("/blog");
        let c = classifier(root);

        assert!(c.classify(Path::new("/blog/posts/.swap.md"), false).is_none());
        assert!(c.classify(Path::new("/elsewhere/file.md"), false).is_none());
        assert!(
            c.classify(Path::new("/blog/templates/styles.css"), false)
                .is_none()
        );
    }
}
