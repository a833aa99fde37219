use std::path::{Path, PathBuf};

use crate::config::Config;

use super::content::{ContentDir, ContentError, LoadError};
use super::document::{ContentItem, StaticFile};
use super::highlight::SyntaxHighlighter;
use super::index::SiteIndex;
use super::paths::url_to_output_path;
use super::pipeline::{FeedStage, IndexStage, Pipeline, PipelineContext, RenderDoc};
use super::render::{RenderError, Renderer, SiteContext};

/// Fatal build errors. Per-document and per-artifact problems never show up
/// here; they are collected into the `BuildResult` instead.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single skipped document, file, or site artifact, with enough context
/// for the report.
#[derive(Debug)]
pub struct BuildFailure {
    /// Source path relative to the content root, or the output artifact for
    /// finalize failures
    pub path: PathBuf,
    /// Which phase failed ("parse", "read", "markdown", "layout", "write",
    /// "copy", "index", "feed")
    pub phase: &'static str,
    pub detail: String,
}

impl std::fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.path.display(), self.phase, self.detail)
    }
}

/// Summary of a build run.
pub struct BuildResult {
    pub output_dir: PathBuf,
    /// Posts rendered and written
    pub posts: usize,
    pub static_files: usize,
    /// Posts skipped because of `draft: true`
    pub drafts: usize,
    pub failures: Vec<BuildFailure>,
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
    dev_mode: bool,
    live_reload: bool,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        Self {
            config,
            base_path,
            dev_mode: false,
            live_reload: false,
        }
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_live_reload(mut self, live_reload: bool) -> Self {
        self.live_reload = live_reload;
        self
    }

    /// Run the full build: load content, render every post, write the
    /// index and feed, copy static files through.
    ///
    /// Only an unusable content root, templates directory, or output root
    /// is fatal; anything that takes out a single document or a single
    /// site artifact is collected into the result's `failures`.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        // Step 1: Load content
        let content_dir = ContentDir::new(self.content_path())?;
        let loaded = content_dir.load()?;

        let mut posts = Vec::new();
        let mut static_files = Vec::new();
        for item in loaded.items {
            match item {
                ContentItem::Post(doc) => posts.push(doc),
                ContentItem::Static(file) => static_files.push(file),
            }
        }
        println!(
            "Found {} post(s) and {} static file(s) in {}",
            posts.len(),
            static_files.len(),
            content_dir.root().display()
        );

        let mut failures: Vec<BuildFailure> = loaded
            .failures
            .into_iter()
            .map(|failure| {
                let phase = match &failure.error {
                    LoadError::Read(_) => "read",
                    LoadError::FrontMatter(_) => "parse",
                };
                BuildFailure {
                    path: failure.path,
                    phase,
                    detail: failure.error.to_string(),
                }
            })
            .collect();

        // Step 2: Load the renderer (validates the templates directory)
        let renderer = Renderer::new(&self.templates_path())?;

        // Step 3: Create the output root
        let output_dir = self.output_dir();
        std::fs::create_dir_all(&output_dir)?;

        // Step 4: Shared pipeline context
        let site = self.site_context();
        let highlighter = SyntaxHighlighter::default();
        let ctx = PipelineContext::new(
            &output_dir,
            &site,
            &self.config.theme.settings,
            &self.config.markdown,
            &self.config.theme.default_layout,
            &highlighter,
            &renderer,
            self.dev_mode,
            self.live_reload,
        );

        // Step 5: Run the per-document stages
        let mut pipeline = Pipeline::default_pipeline();
        pipeline.add_finalize_stage(IndexStage);
        match (&self.config.site.url, self.config.feed.enabled) {
            (Some(url), true) => {
                pipeline.add_finalize_stage(FeedStage {
                    base_url: url.clone(),
                    filename: self.config.feed.filename.clone(),
                });
            }
            (None, true) => {
                eprintln!("feed generation skipped: site.url is not set");
            }
            _ => {}
        }

        let docs: Vec<RenderDoc> = posts.into_iter().map(RenderDoc::new).collect();
        let outcome = pipeline.run(docs, &ctx);

        failures.extend(outcome.failures.into_iter().map(|failure| BuildFailure {
            path: failure.source_path,
            phase: failure.stage,
            detail: failure.error.to_string(),
        }));

        // Step 6: Index and feed over the posts that made it
        let index = SiteIndex::from_documents(outcome.rendered.iter().map(|d| &d.doc));
        failures.extend(
            pipeline
                .finalize(&index, &ctx)
                .into_iter()
                .map(|failure| BuildFailure {
                    path: failure.artifact,
                    phase: failure.stage,
                    detail: failure.error.to_string(),
                }),
        );

        // Step 7: Copy static files through
        let mut copied = 0;
        for file in &static_files {
            match self.copy_static(file, content_dir.root(), &output_dir) {
                Ok(()) => copied += 1,
                Err(e) => failures.push(BuildFailure {
                    path: file.source_path.clone(),
                    phase: "copy",
                    detail: e.to_string(),
                }),
            }
        }

        println!(
            "Wrote {} post(s) and {} static file(s) to {}",
            index.len(),
            copied,
            output_dir.display()
        );

        Ok(BuildResult {
            output_dir,
            posts: index.len(),
            static_files: copied,
            drafts: loaded.drafts,
            failures,
        })
    }

    fn copy_static(
        &self,
        file: &StaticFile,
        content_root: &Path,
        output_dir: &Path,
    ) -> Result<(), std::io::Error> {
        let input_path = content_root.join(&file.source_path);
        let output_path = url_to_output_path(&file.url_path, output_dir);

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&input_path, &output_path)?;
        Ok(())
    }

    fn site_context(&self) -> SiteContext {
        SiteContext {
            title: self.config.site.title.clone(),
            url: self.config.site.url.clone(),
            description: self.config.site.description.clone(),
            author: self.config.site.author.clone(),
        }
    }

    fn content_path(&self) -> PathBuf {
        self.resolve(&self.config.content)
    }

    fn templates_path(&self) -> PathBuf {
        self.resolve(&self.config.templates)
    }

    fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_path.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::{Config, SiteConfig};

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn scaffold(root: &Path) {
        write(
            root,
            "templates/post.html",
            "<html><head><meta name=\"title\" content=\"{{ page.title }}\">\
             <time datetime=\"{{ page.date }}\"></time></head>\
             <body>{{ content | safe }}</body></html>",
        );
        write(
            root,
            "templates/index.html",
            "<ul>{% for post in posts %}<li><a href=\"{{ post.url }}\">{{ post.title }}</a></li>{% endfor %}</ul>",
        );
    }

    fn test_config(url: Option<&str>) -> Config {
        Config {
            site: SiteConfig {
                title: "Design Notes".to_string(),
                url: url.map(str::to_string),
                description: Some("Essays on software design".to_string()),
                author: None,
            },
            content: PathBuf::from("posts"),
            templates: PathBuf::from("templates"),
            output: PathBuf::from("_site"),
            theme: Default::default(),
            markdown: Default::default(),
            feed: Default::default(),
            dev: Default::default(),
        }
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut stack = vec![dir.to_path_buf()];
        while let Some(current) = stack.pop() {
            for entry in std::fs::read_dir(&current).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let relative = path.strip_prefix(dir).unwrap().to_path_buf();
                    files.insert(relative, std::fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    #[test]
    fn test_build_writes_posts_and_index() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/newer.md",
            "---\ntitle: Newer Post\ndate: 2024-06-15\n---\n\n# Heading\n\nBody\n",
        );
        write(
            tmp.path(),
            "posts/older.md",
            "---\ntitle: Older Post\ndate: 2023-01-01\n---\n\nBody\n",
        );
        write(tmp.path(), "posts/style.css", "body { margin: 0 }");

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        let result = builder.build().unwrap();

        assert_eq!(result.posts, 2);
        assert_eq!(result.static_files, 1);
        assert!(result.failures.is_empty());

        let out = result.output_dir;
        assert!(out.join("2024/06/newer/index.html").exists());
        assert!(out.join("2023/01/older/index.html").exists());
        assert!(out.join("style.css").exists());

        let index = std::fs::read_to_string(out.join("index.html")).unwrap();
        let newer_pos = index.find("Newer Post").unwrap();
        let older_pos = index.find("Older Post").unwrap();
        assert!(newer_pos < older_pos, "index must be newest-first");
    }

    #[test]
    fn test_rendered_page_embeds_recoverable_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/roundtrip.md",
            "---\ntitle: Functional Error Handling\ndate: 2024-06-15\n---\n\nBody\n",
        );

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        let result = builder.build().unwrap();

        let html = std::fs::read_to_string(
            result.output_dir.join("2024/06/roundtrip/index.html"),
        )
        .unwrap();
        assert!(html.contains("content=\"Functional Error Handling\""));
        assert!(html.contains("datetime=\"2024-06-15\""));
    }

    #[test]
    fn test_malformed_date_reported_and_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/good.md",
            "---\ntitle: Good\ndate: 2024-01-01\n---\n\nBody\n",
        );
        write(
            tmp.path(),
            "posts/bad.md",
            "---\ntitle: Bad\ndate: soonish\n---\n\nBody\n",
        );

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        let result = builder.build().unwrap();

        assert_eq!(result.posts, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, PathBuf::from("bad.md"));
        assert_eq!(result.failures[0].phase, "parse");

        let index = std::fs::read_to_string(result.output_dir.join("index.html")).unwrap();
        assert!(index.contains("Good"));
        assert!(!index.contains("Bad"));
    }

    #[test]
    fn test_unknown_layout_reported_and_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/odd.md",
            "---\ntitle: Odd\ndate: 2024-01-01\nlayout: gallery\n---\n\nBody\n",
        );

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        let result = builder.build().unwrap();

        assert_eq!(result.posts, 0);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].phase, "layout");
    }

    #[test]
    fn test_empty_input_builds_empty_index() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        std::fs::create_dir_all(tmp.path().join("posts")).unwrap();

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        let result = builder.build().unwrap();

        assert_eq!(result.posts, 0);
        assert!(result.failures.is_empty());
        assert!(result.output_dir.join("index.html").exists());
    }

    #[test]
    fn test_feed_written_when_url_configured() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\n---\n\nBody\n",
        );

        let builder = Builder::new(
            test_config(Some("https://example.com")),
            tmp.path().to_path_buf(),
        );
        let result = builder.build().unwrap();

        let feed = std::fs::read_to_string(result.output_dir.join("feed.xml")).unwrap();
        assert!(feed.contains("https://example.com/2024/01/hello"));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/one.md",
            "---\ntitle: One\ndate: 2024-03-10\ntags: [a, b]\n---\n\n## Section\n\n```rust\nlet x = 1;\n```\n",
        );
        write(
            tmp.path(),
            "posts/two.md",
            "---\ntitle: Two\ndate: 2024-03-11\n---\n\nBody\n",
        );

        let config = test_config(Some("https://example.com"));

        let first = Builder::new(config.clone(), tmp.path().to_path_buf())
            .build()
            .unwrap();
        let first_snapshot = snapshot(&first.output_dir);

        let second = Builder::new(config, tmp.path().to_path_buf())
            .build()
            .unwrap();
        let second_snapshot = snapshot(&second.output_dir);

        assert_eq!(first_snapshot, second_snapshot);
    }

    #[test]
    fn test_blocked_feed_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());
        write(
            tmp.path(),
            "posts/hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\n---\n\nBody\n",
        );
        // A directory squatting on the feed path makes the write fail
        std::fs::create_dir_all(tmp.path().join("_site/feed.xml")).unwrap();

        let builder = Builder::new(
            test_config(Some("https://example.com")),
            tmp.path().to_path_buf(),
        );
        let result = builder.build().unwrap();

        assert_eq!(result.posts, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].phase, "feed");
        assert!(result.output_dir.join("index.html").exists());
    }

    #[test]
    fn test_missing_content_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());

        let builder = Builder::new(test_config(None), tmp.path().to_path_buf());
        assert!(matches!(builder.build(), Err(BuildError::Content(_))));
    }
}
