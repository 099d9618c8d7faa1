//! Error types for template compilation and execution.

use thiserror::Error;

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// A syntax error located in the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte range in the template source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Errors raised while compiling or running a template.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The template does not parse.
    #[error("syntax error: {}", summarize(.0))]
    Syntax(Vec<SyntaxError>),

    /// An identifier is neither a local nor a host global.
    #[error("{0} is not defined")]
    Undefined(String),

    /// A property read or write on a value that does not have it.
    #[error("cannot access property \"{property}\" of {target}")]
    NoProperty {
        /// Description of the accessed value.
        target: String,
        /// Property name.
        property: String,
    },

    /// A method call on a value that does not provide it.
    #[error("{target}.{method} is not a function")]
    NoMethod {
        /// Description of the receiver.
        target: String,
        /// Method name.
        method: String,
    },

    /// A call on something that is not a function.
    #[error("{0} is not a function")]
    NotCallable(String),

    /// A function received the wrong number of arguments.
    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        /// Function or method name.
        name: String,
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        got: usize,
    },

    /// An operand or argument has the wrong type.
    #[error("type error: {0}")]
    Type(String),

    /// Failure reported by the host, such as an unknown passage name.
    #[error("{0}")]
    Host(String),
}

fn summarize(errors: &[SyntaxError]) -> String {
    match errors {
        [] => "invalid template".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_summary() {
        let one = ScriptError::Syntax(vec![SyntaxError {
            span: 0..1,
            message: "found '}'".into(),
        }]);
        assert_eq!(one.to_string(), "syntax error: found '}'");

        let two = ScriptError::Syntax(vec![
            SyntaxError {
                span: 0..1,
                message: "a".into(),
            },
            SyntaxError {
                span: 2..3,
                message: "b".into(),
            },
        ]);
        assert_eq!(two.to_string(), "syntax error: a (and 1 more)");
    }

    #[test]
    fn host_errors_show_their_message() {
        let e = ScriptError::Host("Couldn't find passage with name \"x\"".into());
        assert_eq!(e.to_string(), "Couldn't find passage with name \"x\"");
    }
}
