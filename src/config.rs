use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Site configuration
// =============================================================================

/// The top-level configuration, loaded from `folio.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    /// Directory containing the posts (relative to the config file)
    #[serde(default = "default_content")]
    pub content: PathBuf,
    /// Directory containing the layout templates
    #[serde(default = "default_templates")]
    pub templates: PathBuf,
    /// Directory the rendered site is written to
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    /// Development-specific settings (watch mode, etc.)
    #[serde(default)]
    pub dev: DevConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    /// Base URL of the published site (required for feed generation)
    pub url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

fn default_content() -> PathBuf {
    PathBuf::from("posts")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

// =============================================================================
// Theme configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Layout used for posts that don't name one in their front matter
    #[serde(default = "default_layout")]
    pub default_layout: String,
    /// Arbitrary settings passed to templates as `theme.*`
    #[serde(default)]
    pub settings: serde_json::Value,
}

fn default_layout() -> String {
    "post".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_layout: default_layout(),
            settings: serde_json::Value::Object(Default::default()),
        }
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "heading_attributes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}

// =============================================================================
// Feed configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Whether to generate an RSS feed (requires `site.url`)
    #[serde(default = "default_feed_enabled")]
    pub enabled: bool,
    /// Output filename, relative to the output directory
    #[serde(default = "default_feed_filename")]
    pub filename: String,
}

fn default_feed_enabled() -> bool {
    true
}

fn default_feed_filename() -> String {
    "feed.xml".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_feed_enabled(),
            filename: default_feed_filename(),
        }
    }
}

// =============================================================================
// Development configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// File watching configuration
    #[serde(default)]
    pub watch: WatchConfig,
    /// Enable live reload in the browser when files change (default: true)
    #[serde(default = "default_live_reload")]
    pub live_reload: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            watch: WatchConfig::default(),
            live_reload: true,
        }
    }
}

fn default_live_reload() -> bool {
    true
}

/// Configuration for file watching during development.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Use polling-based watcher instead of native file system events.
    /// Useful for network filesystems, Docker volumes, or other situations
    /// where native events are unreliable.
    #[serde(default)]
    pub poll: bool,
    /// Poll interval in milliseconds (only used if poll=true).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Debounce timeout in milliseconds.
    /// Changes within this window are batched together.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll: false,
            poll_interval_ms: default_poll_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

impl Config {
    /// Load the config from the command line argument, defaulting to `folio.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new("folio.yaml"));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file).await
    }

    /// Load the config from a file path
    async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Config>()
            .map_err(friendly_error)
    }
}

/// Map the common deserialization failures to messages that name the fix.
fn friendly_error(e: config::ConfigError) -> ConfigError {
    let msg = e.to_string();

    if msg.contains("missing field `site`") {
        return ConfigError::Validation(
            "invalid config: a 'site' section is required\n\nExample:\n  site:\n    title: My Blog"
                .to_string(),
        );
    }
    if msg.contains("missing field `title`") {
        return ConfigError::Validation(
            "invalid config: 'site.title' is required".to_string(),
        );
    }

    ConfigError::Deserialize(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config: Config = serde_yaml::from_str("site:\n  title: Essays\n").unwrap();

        assert_eq!(config.site.title, "Essays");
        assert_eq!(config.content, PathBuf::from("posts"));
        assert_eq!(config.templates, PathBuf::from("templates"));
        assert_eq!(config.output, PathBuf::from("_site"));
        assert_eq!(config.theme.default_layout, "post");
        assert!(config.feed.enabled);
        assert_eq!(config.feed.filename, "feed.xml");
        assert!(config.dev.live_reload);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
site:
  title: Design Notes
  url: https://example.com
  description: Essays on software design
  author: A. Writer
content: essays
output: public
feed:
  enabled: false
markdown:
  extensions: [tables]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.site.url.as_deref(), Some("https://example.com"));
        assert_eq!(config.content, PathBuf::from("essays"));
        assert_eq!(config.output, PathBuf::from("public"));
        assert!(!config.feed.enabled);
        assert_eq!(config.markdown.extensions, vec!["tables".to_string()]);
    }

    #[test]
    fn test_missing_title_is_error() {
        let result = serde_yaml::from_str::<Config>("site:\n  url: https://example.com\n");
        assert!(result.is_err());
    }
}
