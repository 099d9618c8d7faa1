//! Pretty terminal rendering of template syntax errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::SyntaxError;

/// Render syntax errors using ariadne, labelled with the passage name.
pub fn render_syntax_errors(source: &str, passage: &str, errors: &[SyntaxError]) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = clamp(error.span.clone(), source.len());
        Report::build(ReportKind::Error, (passage, span.clone()))
            .with_message(&error.message)
            .with_label(
                Label::new((passage, span))
                    .with_message(&error.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((passage, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

fn clamp(span: std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}
