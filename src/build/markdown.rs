//! Markdown rendering with syntax highlighting and heading anchors.

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use crate::config::MarkdownConfig;
use crate::util::slugify;

use super::highlight::SyntaxHighlighter;

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

fn parser_options(config: &MarkdownConfig) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in &config.extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    Ok(options)
}

/// Render a post body to an HTML fragment.
///
/// Code blocks are run through the syntax highlighter; headings get stable,
/// de-duplicated `id` attributes derived from their text so deep links keep
/// working between rebuilds.
pub fn render_markdown(
    markdown: &str,
    highlighter: &SyntaxHighlighter,
    config: &MarkdownConfig,
) -> Result<String, MarkdownError> {
    let parser = Parser::new_ext(markdown, parser_options(config)?);

    let mut in_code_block = false;
    let mut code_language = String::new();
    let mut code_content = String::new();

    let mut heading_level: Option<pulldown_cmark::HeadingLevel> = None;
    let mut heading_text = String::new();
    let mut used_ids: HashSet<String> = HashSet::new();

    let events: Vec<Event> = parser
        .flat_map(|event| match event {
            Event::Start(Tag::Heading { level, ref id, .. }) => {
                // Headings that carry an explicit id pass through untouched
                if let Some(existing) = id {
                    used_ids.insert(existing.to_string());
                    return vec![event];
                }
                heading_level = Some(level);
                heading_text.clear();
                vec![]
            }
            Event::End(TagEnd::Heading(_)) if heading_level.is_some() => {
                let level = heading_level.take().unwrap_or(pulldown_cmark::HeadingLevel::H2);

                let base_id = slugify(&heading_text);
                let mut id = base_id.clone();
                let mut suffix = 1;
                while used_ids.contains(&id) {
                    id = format!("{}-{}", base_id, suffix);
                    suffix += 1;
                }
                used_ids.insert(id.clone());

                vec![Event::Html(
                    format!(
                        "<h{level} id=\"{id}\">{text}</h{level}>",
                        level = level as usize,
                        id = id,
                        text = heading_text,
                    )
                    .into(),
                )]
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code_language = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_content.clear();
                vec![]
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let highlighted = highlighter.highlight(&code_content, &code_language);
                vec![Event::Html(highlighted.into())]
            }
            Event::Text(text) if in_code_block => {
                code_content.push_str(&text);
                vec![]
            }
            Event::Text(text) if heading_level.is_some() => {
                heading_text.push_str(&text);
                vec![]
            }
            Event::Code(code) if heading_level.is_some() => {
                heading_text.push_str(&code);
                vec![]
            }
            _ => vec![event],
        })
        .collect();

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());

    Ok(output)
}
