//! Code block highlighting for the code samples embedded in posts.

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language};

/// A syntax highlighter using autumnus (tree-sitter based).
///
/// Produces class-annotated HTML; the theme's stylesheet supplies the
/// colors. Unknown languages fall back to a plain escaped code block.
#[derive(Default)]
pub struct SyntaxHighlighter;

impl SyntaxHighlighter {
    pub fn highlight(&self, code: &str, language: &str) -> String {
        let lang = Language::guess(language, code);

        // Language::guess falls back to PlainText for anything it doesn't
        // recognize; keep the author's language tag on the fallback block.
        if matches!(lang, Language::PlainText)
            && !language.is_empty()
            && language != "plaintext"
            && language != "text"
        {
            return plain_code_block(code, language);
        }

        let formatter = HtmlLinkedBuilder::new().source(code).lang(lang).build();

        match formatter {
            Ok(f) => {
                let mut output: Vec<u8> = Vec::new();
                if f.format(&mut output).is_ok() {
                    String::from_utf8(output).unwrap_or_else(|_| plain_code_block(code, language))
                } else {
                    plain_code_block(code, language)
                }
            }
            Err(_) => plain_code_block(code, language),
        }
    }
}

fn plain_code_block(code: &str, language: &str) -> String {
    let escaped = html_escape(code);
    if language.is_empty() {
        format!("<pre><code>{}</code></pre>", escaped)
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            language, escaped
        )
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
