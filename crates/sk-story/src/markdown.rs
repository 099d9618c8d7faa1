//! Markdown to HTML.

use pulldown_cmark::{Options, Parser, html};

/// Render markdown source to an HTML fragment.
pub fn render(source: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, Parser::new_ext(source, options));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_emphasis() {
        assert_eq!(render("north"), "<p>north</p>\n");
        assert_eq!(render("*dark* cave"), "<p><em>dark</em> cave</p>\n");
    }

    #[test]
    fn inline_html_passes_through() {
        assert!(render("a <b>bold</b> move").contains("<b>bold</b>"));
    }

    #[test]
    fn empty_source_renders_nothing() {
        assert_eq!(render(""), "");
    }
}
