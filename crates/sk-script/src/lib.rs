//! Passage template language.
//!
//! Passage content mixes literal text with embedded code in `<% %>` tags.
//! `<%= expr %>` interpolates a value as-is, `<%- expr %>` interpolates it
//! HTML-escaped, and `<% code %>` runs statements without output. Code
//! reaches the outside world only through a [`ScriptHost`].

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Template;
pub use error::{ScriptError, ScriptResult, SyntaxError};
pub use host::{EmptyHost, ScriptHost};
pub use interpreter::{Interpreter, escape_html};
pub use value::Value;

/// Compile template source into a reusable [`Template`].
pub fn compile(source: &str) -> ScriptResult<Template> {
    let (tokens, lex_errors) = lexer::lex(source);

    let mut errors: Vec<SyntaxError> = lex_errors
        .into_iter()
        .map(|e| SyntaxError {
            span: e.span,
            message: e.message,
        })
        .collect();

    match parser::parse(&tokens) {
        Ok(template) if errors.is_empty() => Ok(template),
        Ok(_) => Err(ScriptError::Syntax(errors)),
        Err(parse_errors) => {
            errors.extend(parse_errors.into_iter().map(|e| SyntaxError {
                span: e.span,
                message: e.message,
            }));
            Err(ScriptError::Syntax(errors))
        }
    }
}

impl Template {
    /// Execute the template against a host and return the processed text.
    pub fn render(&self, host: &mut dyn ScriptHost) -> ScriptResult<String> {
        Interpreter::new(host).run(self)
    }

    /// Whether the template is plain text with no embedded code.
    pub fn is_static(&self) -> bool {
        self.body.iter().all(|stmt| matches!(stmt, ast::Stmt::Text(_)))
    }
}

/// Compile and render template source in one step.
pub fn render(source: &str, host: &mut dyn ScriptHost) -> ScriptResult<String> {
    compile(source)?.render(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let out = render("Just text, no tags.", &mut EmptyHost).unwrap();
        assert_eq!(out, "Just text, no tags.");
        assert!(compile("plain").unwrap().is_static());
    }

    #[test]
    fn empty_source_renders_empty() {
        assert_eq!(render("", &mut EmptyHost).unwrap(), "");
    }

    #[test]
    fn syntax_errors_are_collected() {
        let err = compile("a <%= 1 + %> b").unwrap_err();
        match err {
            ScriptError::Syntax(errors) => assert!(!errors.is_empty()),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_tag_is_a_syntax_error() {
        assert!(matches!(
            compile("oops <%= 1"),
            Err(ScriptError::Syntax(_))
        ));
    }

    #[test]
    fn compiled_template_renders_repeatedly() {
        let template = compile("<% let n = 2 %><%= n * 3 %>").unwrap();
        assert_eq!(template.render(&mut EmptyHost).unwrap(), "6");
        assert_eq!(template.render(&mut EmptyHost).unwrap(), "6");
    }
}
