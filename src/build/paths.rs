//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative paths within the content directory)
//! - URL paths (the URL at which content will be served)
//! - Output file paths (where files are written in the output directory)

use std::path::{Path, PathBuf};

use super::date::PostDate;

/// Build the canonical URL path for a post from its date and slug.
///
/// Permalinks are date-prefixed so they stay stable and unambiguous even
/// when two posts share a slug in different months.
///
/// # Examples
/// ```ignore
/// post_url(2024-06-15, "functional-error-handling") => "/2024/06/functional-error-handling"
/// ```
pub fn post_url(date: PostDate, slug: &str) -> String {
    format!("/{:04}/{:02}/{}", date.year(), date.month(), slug)
}

/// Convert a static file path to a URL path.
///
/// Static files keep their extension and relative location.
///
/// # Examples
/// ```ignore
/// static_path_to_url("images/diagram.png") => "/images/diagram.png"
/// ```
pub fn static_path_to_url(path: &Path) -> String {
    let path_str = path.to_string_lossy().replace('\\', "/");
    format!("/{}", path_str.trim_start_matches('/'))
}

/// Convert a URL path to an output file path.
///
/// Pages (no extension) become `path/index.html`.
/// Static files (with extension) keep their path.
///
/// # Examples
/// ```ignore
/// url_to_output_path("/2024/06/post", output_dir) => output_dir/2024/06/post/index.html
/// url_to_output_path("/", output_dir) => output_dir/index.html
/// url_to_output_path("/style.css", output_dir) => output_dir/style.css
/// ```
pub fn url_to_output_path(url_path: &str, output_dir: &Path) -> PathBuf {
    let url_path = url_path.trim_start_matches('/');

    if url_path.is_empty() {
        output_dir.join("index.html")
    } else if url_path.contains('.') {
        output_dir.join(url_path)
    } else {
        output_dir.join(url_path).join("index.html")
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
