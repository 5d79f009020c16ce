//! Report rendering: Markdown → sanitized HTML.
//!
//! The report text comes from a model and must be treated as untrusted
//! input. pulldown-cmark produces the markup (GFM tables on, single
//! newlines as hard breaks to match how the reports are written) and
//! ammonia strips script-bearing constructs before the HTML ever reaches a
//! page. Sanitization is not optional behind a flag — there is no code
//! path that returns unsanitized markup.

use pulldown_cmark::{Event, Options, Parser};

/// Render report Markdown to sanitized HTML.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // breaks: a single newline becomes a hard break, like the reports'
    // original presentation.
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut html = String::with_capacity(markdown.len() * 2);
    pulldown_cmark::html::push_html(&mut html, parser);

    ammonia::clean(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render_html("# Review\n\nThis is **important**.");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>important</strong>"));
    }

    #[test]
    fn renders_gfm_tables() {
        let html = render_html("| A | B |\n| --- | --- |\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn single_newline_is_hard_break() {
        let html = render_html("line one\nline two");
        assert!(html.contains("<br"));
    }

    #[test]
    fn script_tags_are_neutralised() {
        let html = render_html("hello <script>alert(1)</script> world");
        assert!(!html.contains("<script"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn event_handlers_are_stripped() {
        let html = render_html("<img src=\"x\" onerror=\"alert(1)\">");
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn javascript_urls_are_stripped() {
        let html = render_html("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }
}
