//! Parser from template tokens to the syntax tree.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::lexer::Token;

type Span = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Byte range of the offending tokens.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

enum Postfix {
    Member(String),
    Call(Vec<Expr>),
}

/// Build the expression parser.
///
/// Precedence, loosest first: `||`, `&&`, equality, comparison, additive,
/// multiplicative, prefix, postfix (member access and calls).
fn expr_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let ident = select! { Token::Ident(name) => name }.labelled("identifier");

        let literal = select! {
            Token::Number(n) => Expr::Number(n),
            Token::Str(s) => Expr::Str(s),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
            Token::Null => Expr::Null,
        }
        .labelled("literal");

        let atom = choice((
            literal,
            ident.clone().map(Expr::Ident),
            expr.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        ));

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<Expr>>()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("arguments");

        let postfix = atom.foldl(
            choice((
                just(Token::Dot).ignore_then(ident).map(Postfix::Member),
                args.map(Postfix::Call),
            ))
            .repeated(),
            |lhs, op| match op {
                Postfix::Member(property) => Expr::Member {
                    object: Box::new(lhs),
                    property,
                },
                Postfix::Call(args) => Expr::Call {
                    callee: Box::new(lhs),
                    args,
                },
            },
        );

        let unary = choice((
            just(Token::Not).to(UnaryOp::Not),
            just(Token::Minus).to(UnaryOp::Neg),
        ))
        .repeated()
        .foldr(postfix, |op, expr| Expr::Unary {
            op,
            expr: Box::new(expr),
        });

        let product = unary.clone().foldl(
            choice((
                just(Token::Star).to(BinaryOp::Mul),
                just(Token::Slash).to(BinaryOp::Div),
                just(Token::Percent).to(BinaryOp::Rem),
            ))
            .then(unary)
            .repeated(),
            |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
        );

        let sum = product.clone().foldl(
            choice((
                just(Token::Plus).to(BinaryOp::Add),
                just(Token::Minus).to(BinaryOp::Sub),
            ))
            .then(product)
            .repeated(),
            |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
        );

        let comparison = sum.clone().foldl(
            choice((
                just(Token::LtEq).to(BinaryOp::LtEq),
                just(Token::GtEq).to(BinaryOp::GtEq),
                just(Token::Lt).to(BinaryOp::Lt),
                just(Token::Gt).to(BinaryOp::Gt),
            ))
            .then(sum)
            .repeated(),
            |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
        );

        let equality = comparison.clone().foldl(
            choice((
                just(Token::Eq).to(BinaryOp::Eq),
                just(Token::NotEq).to(BinaryOp::NotEq),
            ))
            .then(comparison)
            .repeated(),
            |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
        );

        let and = equality.clone().foldl(
            just(Token::AndAnd)
                .to(BinaryOp::And)
                .then(equality)
                .repeated(),
            |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
        );

        and.clone()
            .foldl(
                just(Token::OrOr).to(BinaryOp::Or).then(and).repeated(),
                |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
            )
            .labelled("expression")
            .boxed()
    })
}

/// Build the full template parser.
fn template_parser<'a, I>() -> impl Parser<'a, I, Template, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    let expr = expr_parser();
    let ident = select! { Token::Ident(name) => name }.labelled("identifier");

    // `;` and the end of a code tag both separate statements.
    let separator = choice((just(Token::Semi), just(Token::TagEnd))).ignored();

    let stmt = recursive(|stmt| {
        let body = choice((stmt.clone().map(Some), separator.clone().to(None)))
            .repeated()
            .collect::<Vec<Option<Stmt>>>()
            .map(|stmts| stmts.into_iter().flatten().collect::<Vec<Stmt>>());

        let block = body.delimited_by(just(Token::LBrace), just(Token::RBrace));

        let text = select! { Token::Text(s) => Stmt::Text(s) };

        let emit = choice((
            just(Token::Interpolate).to(false),
            just(Token::InterpolateEscaped).to(true),
        ))
        .then(expr.clone())
        .then_ignore(just(Token::InterpolateEnd))
        .map(|(escape, expr)| Stmt::Emit { expr, escape })
        .labelled("interpolation");

        let let_stmt = just(Token::Let)
            .ignore_then(ident.clone())
            .then_ignore(just(Token::Assign))
            .then(expr.clone())
            .map(|(name, value)| Stmt::Let { name, value })
            .labelled("declaration");

        // `else if` is an `else` followed by a single `if` statement.
        let otherwise = just(Token::Else).ignore_then(choice((
            block.clone(),
            stmt.clone().map(|s| vec![s]),
        )));

        let if_stmt = just(Token::If)
            .ignore_then(expr.clone())
            .then(block)
            .then(otherwise.or_not())
            .map(|((cond, then), otherwise)| Stmt::If {
                cond,
                then,
                otherwise: otherwise.unwrap_or_default(),
            })
            .labelled("if statement");

        let assign_op = choice((
            just(Token::Assign).to(AssignOp::Set),
            just(Token::PlusAssign).to(AssignOp::Add),
            just(Token::MinusAssign).to(AssignOp::Sub),
        ));

        let expr_stmt = expr
            .clone()
            .then(assign_op.then(expr.clone()).or_not())
            .try_map(|(target, assignment), span| match assignment {
                None => Ok(Stmt::Expr(target)),
                Some((op, value)) if target.is_assignable() => Ok(Stmt::Assign { target, op, value }),
                Some(_) => Err(Rich::custom(span, "invalid assignment target")),
            });

        choice((text, emit, let_stmt, if_stmt, expr_stmt))
    });

    choice((stmt.map(Some), separator.to(None)))
        .repeated()
        .collect::<Vec<Option<Stmt>>>()
        .then_ignore(end())
        .map(|stmts| Template {
            body: stmts.into_iter().flatten().collect(),
        })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a token stream into a template.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Template, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = template_parser().parse(stream).into_output_errors();

    match output {
        Some(template) if errors.is_empty() => Ok(template),
        _ => Err(errors
            .into_iter()
            .map(|e| {
                let span = e.span();
                ParseError {
                    span: span.into_range(),
                    message: e.to_string(),
                }
            })
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_source(source: &str) -> Result<Template, Vec<ParseError>> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "lex errors: {errors:?}");
        parse(&tokens)
    }

    fn body(source: &str) -> Vec<Stmt> {
        parse_source(source).expect("template should parse").body
    }

    #[test]
    fn parse_plain_text() {
        assert_eq!(body("Just text."), vec![Stmt::Text("Just text.".into())]);
    }

    #[test]
    fn parse_empty_template() {
        assert!(body("").is_empty());
    }

    #[test]
    fn parse_interpolation() {
        assert_eq!(
            body("Gold: <%= gold %>"),
            vec![
                Stmt::Text("Gold: ".into()),
                Stmt::Emit {
                    expr: Expr::Ident("gold".into()),
                    escape: false,
                },
            ]
        );
    }

    #[test]
    fn parse_method_call() {
        assert_eq!(
            body(r#"<% story.addLootItem("sword") %>"#),
            vec![Stmt::Expr(Expr::Call {
                callee: Box::new(Expr::Member {
                    object: Box::new(Expr::Ident("story".into())),
                    property: "addLootItem".into(),
                }),
                args: vec![Expr::Str("sword".into())],
            })]
        );
    }

    #[test]
    fn parse_precedence() {
        let stmts = body("<%= 1 + 2 * 3 %>");
        let Stmt::Emit { expr, .. } = &stmts[0] else {
            panic!("expected interpolation");
        };
        assert_eq!(
            *expr,
            Expr::binary(
                BinaryOp::Add,
                Expr::Number(1.0),
                Expr::binary(BinaryOp::Mul, Expr::Number(2.0), Expr::Number(3.0)),
            )
        );
    }

    #[test]
    fn parse_logical_chain() {
        let stmts = body("<%= a || b && !c %>");
        let Stmt::Emit { expr, .. } = &stmts[0] else {
            panic!("expected interpolation");
        };
        let Expr::Binary { op, rhs, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Or);
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn parse_let_and_assign() {
        assert_eq!(
            body("<% let x = 1; x += 2 %>"),
            vec![
                Stmt::Let {
                    name: "x".into(),
                    value: Expr::Number(1.0),
                },
                Stmt::Assign {
                    target: Expr::Ident("x".into()),
                    op: AssignOp::Add,
                    value: Expr::Number(2.0),
                },
            ]
        );
    }

    #[test]
    fn parse_if_spanning_tags() {
        let stmts = body("<% if (vars.met) { %>Again?<% } else { %>Hello.<% } %>");
        assert_eq!(stmts.len(), 1);
        let Stmt::If { then, otherwise, .. } = &stmts[0] else {
            panic!("expected if");
        };
        assert_eq!(then, &vec![Stmt::Text("Again?".into())]);
        assert_eq!(otherwise, &vec![Stmt::Text("Hello.".into())]);
    }

    #[test]
    fn parse_else_if() {
        let stmts = body("<% if (a) { %>A<% } else if (b) { %>B<% } %>");
        let Stmt::If { otherwise, .. } = &stmts[0] else {
            panic!("expected if");
        };
        assert!(matches!(otherwise.as_slice(), [Stmt::If { .. }]));
    }

    #[test]
    fn invalid_assignment_target() {
        assert!(parse_source("<% 1 = 2 %>").is_err());
    }

    #[test]
    fn unbalanced_block_is_an_error() {
        let errors = parse_source("<% if (a) { %>never closed").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn unterminated_interpolation_is_an_error() {
        assert!(parse_source("<%= a + %>").is_err());
    }
}
