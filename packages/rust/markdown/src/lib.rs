//! Markdown-to-HTML rendering for exported articles.
//!
//! Articles arrive as Markdown from the AI backend. For HTML export they are
//! rendered with `pulldown-cmark` (tables, fenced code, single newlines kept
//! as line breaks) and wrapped in a standalone right-to-left page.

mod template;

use pulldown_cmark::{Event, Options, Parser, html};
use tracing::{debug, instrument};

/// Render Markdown to an HTML fragment.
///
/// Soft line breaks are emitted as `<br />` so that line-oriented AI output
/// keeps its shape.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Render Markdown into a complete RTL HTML document titled `title`.
#[instrument(skip(markdown), fields(markdown_len = markdown.len()))]
pub fn render_page(title: &str, markdown: &str) -> String {
    let body = markdown_to_html(markdown);
    let page = template::wrap_page(title, &body);
    debug!(html_len = page.len(), "rendered HTML page");
    page
}
