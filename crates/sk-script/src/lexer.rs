//! Tokenizer for passage templates: literal text plus the code inside tags.

use logos::Logos;
use std::fmt;

/// Token type for passage templates.
///
/// Literal text between tags becomes a single `Text` token, so a whole
/// passage is one token stream and a block opened in one tag can close in a
/// later one.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text outside of any tag.
    Text(String),
    /// `<%=`, opening a raw interpolation.
    Interpolate,
    /// `<%-`, opening an HTML-escaped interpolation.
    InterpolateEscaped,
    /// `%>` closing an interpolation.
    InterpolateEnd,
    /// `%>` closing a code tag. Acts as a statement separator.
    TagEnd,
    /// `let`, `var` or `const`.
    Let,
    /// `if`.
    If,
    /// `else`.
    Else,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `null` or `undefined`.
    Null,
    /// Identifier.
    Ident(String),
    /// Numeric literal.
    Number(f64),
    /// String literal with escapes resolved.
    Str(String),
    /// `(`.
    LParen,
    /// `)`.
    RParen,
    /// `{`.
    LBrace,
    /// `}`.
    RBrace,
    /// `,`.
    Comma,
    /// `.`.
    Dot,
    /// `;`.
    Semi,
    /// `=`.
    Assign,
    /// `+=`.
    PlusAssign,
    /// `-=`.
    MinusAssign,
    /// `+`.
    Plus,
    /// `-`.
    Minus,
    /// `*`.
    Star,
    /// `/`.
    Slash,
    /// `%`.
    Percent,
    /// `!`.
    Not,
    /// `&&`.
    AndAnd,
    /// `||`.
    OrOr,
    /// `==` or `===`.
    Eq,
    /// `!=` or `!==`.
    NotEq,
    /// `<`.
    Lt,
    /// `<=`.
    LtEq,
    /// `>`.
    Gt,
    /// `>=`.
    GtEq,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(_) => write!(f, "text"),
            Token::Interpolate => write!(f, "<%="),
            Token::InterpolateEscaped => write!(f, "<%-"),
            Token::InterpolateEnd | Token::TagEnd => write!(f, "%>"),
            Token::Let => write!(f, "let"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Semi => write!(f, ";"),
            Token::Assign => write!(f, "="),
            Token::PlusAssign => write!(f, "+="),
            Token::MinusAssign => write!(f, "-="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Not => write!(f, "!"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Eq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
        }
    }
}

/// Code tokens inside a tag. Converted to owned `Token`s after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[token("let")]
    #[token("var")]
    #[token("const")]
    Let,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    #[token("undefined")]
    Null,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    Str,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semi,

    #[token("=")]
    Assign,

    #[token("+=")]
    PlusAssign,

    #[token("-=")]
    MinusAssign,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Not,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("==")]
    #[token("===")]
    Eq,

    #[token("!=")]
    #[token("!==")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

const TAG_OPEN: &str = "<%";
const TAG_CLOSE: &str = "%>";

/// Lex a passage template into a sequence of `(Token, Span)` pairs.
///
/// Returns the token stream and any lexer errors. Lexing continues past
/// errors inside a tag; an unclosed tag ends lexing.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let Some(found) = source[pos..].find(TAG_OPEN) else {
            tokens.push((Token::Text(source[pos..].to_string()), pos..source.len()));
            break;
        };

        let open = pos + found;
        if open > pos {
            tokens.push((Token::Text(source[pos..open].to_string()), pos..open));
        }

        // `<%=` and `<%-` open interpolations, a bare `<%` opens code.
        let after = open + TAG_OPEN.len();
        let (opener, code_start) = match source[after..].chars().next() {
            Some('=') => (Some(Token::Interpolate), after + 1),
            Some('-') => (Some(Token::InterpolateEscaped), after + 1),
            _ => (None, after),
        };

        let Some(close_rel) = source[code_start..].find(TAG_CLOSE) else {
            errors.push(LexError {
                span: open..source.len(),
                message: "unclosed template tag".to_string(),
            });
            break;
        };
        let close = code_start + close_rel;

        let closer = match opener {
            Some(token) => {
                tokens.push((token, open..code_start));
                Token::InterpolateEnd
            }
            None => Token::TagEnd,
        };

        lex_code(&source[code_start..close], code_start, &mut tokens, &mut errors);
        tokens.push((closer, close..close + TAG_CLOSE.len()));
        pos = close + TAG_CLOSE.len();
    }

    (tokens, errors)
}

fn lex_code(
    code: &str,
    offset: usize,
    tokens: &mut Vec<(Token, std::ops::Range<usize>)>,
    errors: &mut Vec<LexError>,
) {
    let mut lexer = RawToken::lexer(code);

    while let Some(result) = lexer.next() {
        let local = lexer.span();
        let span = local.start + offset..local.end + offset;
        let slice = lexer.slice();

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                errors.push(LexError {
                    span,
                    message: format!("unexpected character '{slice}'"),
                });
                continue;
            }
        };

        let token = match raw {
            RawToken::Let => Token::Let,
            RawToken::If => Token::If,
            RawToken::Else => Token::Else,
            RawToken::True => Token::True,
            RawToken::False => Token::False,
            RawToken::Null => Token::Null,
            RawToken::Ident => Token::Ident(slice.to_string()),
            RawToken::Number => match slice.parse::<f64>() {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    errors.push(LexError {
                        span,
                        message: format!("invalid number '{slice}'"),
                    });
                    continue;
                }
            },
            RawToken::Str => Token::Str(unescape(&slice[1..slice.len() - 1])),
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::LBrace => Token::LBrace,
            RawToken::RBrace => Token::RBrace,
            RawToken::Comma => Token::Comma,
            RawToken::Dot => Token::Dot,
            RawToken::Semi => Token::Semi,
            RawToken::Assign => Token::Assign,
            RawToken::PlusAssign => Token::PlusAssign,
            RawToken::MinusAssign => Token::MinusAssign,
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::Percent => Token::Percent,
            RawToken::Not => Token::Not,
            RawToken::AndAnd => Token::AndAnd,
            RawToken::OrOr => Token::OrOr,
            RawToken::Eq => Token::Eq,
            RawToken::NotEq => Token::NotEq,
            RawToken::Lt => Token::Lt,
            RawToken::LtEq => Token::LtEq,
            RawToken::Gt => Token::Gt,
            RawToken::GtEq => Token::GtEq,
        };
        tokens.push((token, span));
    }
}

/// Resolve backslash escapes in a string literal body.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(kinds("Hello [[world]]"), vec![Token::Text("Hello [[world]]".into())]);
    }

    #[test]
    fn empty_source_has_no_tokens() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn interpolation_tags() {
        assert_eq!(
            kinds("a<%= x %>b<%- y %>"),
            vec![
                Token::Text("a".into()),
                Token::Interpolate,
                Token::Ident("x".into()),
                Token::InterpolateEnd,
                Token::Text("b".into()),
                Token::InterpolateEscaped,
                Token::Ident("y".into()),
                Token::InterpolateEnd,
            ]
        );
    }

    #[test]
    fn code_tag_keywords_and_operators() {
        assert_eq!(
            kinds("<% if (hp <= 0) { %>"),
            vec![
                Token::If,
                Token::LParen,
                Token::Ident("hp".into()),
                Token::LtEq,
                Token::Number(0.0),
                Token::RParen,
                Token::LBrace,
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn javascript_style_operators() {
        assert_eq!(
            kinds("<% a === b !== c %>"),
            vec![
                Token::Ident("a".into()),
                Token::Eq,
                Token::Ident("b".into()),
                Token::NotEq,
                Token::Ident("c".into()),
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn exponent_literals() {
        assert_eq!(
            kinds("<%= 1e3 + 2.5E-2 %>"),
            vec![
                Token::Interpolate,
                Token::Number(1000.0),
                Token::Plus,
                Token::Number(0.025),
                Token::InterpolateEnd,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_identifier() {
        assert_eq!(
            kinds("<% letter %>"),
            vec![Token::Ident("letter".into()), Token::TagEnd]
        );
    }

    #[test]
    fn string_literals_with_escapes() {
        assert_eq!(
            kinds(r#"<%= "say \"hi\"" + 'it\'s' %>"#),
            vec![
                Token::Interpolate,
                Token::Str("say \"hi\"".into()),
                Token::Plus,
                Token::Str("it's".into()),
                Token::InterpolateEnd,
            ]
        );
    }

    #[test]
    fn spans_point_into_source() {
        let source = "ab<%= x %>";
        let (tokens, _) = lex(source);
        let (_, span) = &tokens[2];
        assert_eq!(&source[span.clone()], "x");
    }

    #[test]
    fn unclosed_tag_is_an_error() {
        let (_, errors) = lex("text <% story.show(");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span.start, 5);
    }

    #[test]
    fn unexpected_character_is_reported() {
        let (tokens, errors) = lex("<% a # b %>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains('#'));
        assert_eq!(tokens.len(), 3);
    }
}
