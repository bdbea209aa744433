use std::iter::Peekable;

use crate::{
    ast::{Expr, MapEntry, Span, UnaryOp},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{err_at, expect, parse_comma_separated},
        },
    },
};

/// Parses a unary expression.
///
/// Grammar: `unary := "not" unary | postfix`
///
/// # Parameters
/// - `tokens`: Token stream with span information.
///
/// # Returns
/// The parsed expression node.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    if let Some((Token::Not, span)) = tokens.peek() {
        let span = *span;
        tokens.next();
        let right = parse_unary(tokens)?;
        return Ok(Expr::Unary { op: UnaryOp::Not,
                                right: Box::new(right),
                                span });
    }

    parse_postfix(tokens)
}

/// Parses postfix indexing.
///
/// Indexing is repeatable, so `m["a"][0]` parses as nested `Index` nodes.
///
/// Grammar: `postfix := primary ("[" expression "]")*`
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = parse_primary(tokens)?;

    while let Some((Token::LBracket, span)) = tokens.peek() {
        let span = *span;
        tokens.next();

        let index = parse_expression(tokens)?;
        expect(tokens, &Token::RBracket, "Expected ']' after index expression")?;

        left = Expr::Index { left: Box::new(left),
                             index: Box::new(index),
                             span };
    }

    Ok(left)
}

/// Parses a primary expression.
///
/// Primaries are literals, identifiers (optionally followed by a call
/// argument list), parenthesized expressions, array literals, and map
/// literals.
///
/// Grammar:
/// `primary := STRING | NUMBER | TRUE | FALSE | IDENT [ "(" args ")" ]
///           | "(" expression ")" | array | map`
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    match tokens.peek() {
        Some((Token::Str(value), span)) => {
            let expr = Expr::StringLit { value: value.clone(),
                                         span:  *span, };
            tokens.next();
            Ok(expr)
        },

        Some((Token::Number(value), span)) => {
            let expr = Expr::NumberLit { value: *value,
                                         span:  *span, };
            tokens.next();
            Ok(expr)
        },

        Some((Token::Bool(value), span)) => {
            let expr = Expr::BoolLit { value: *value,
                                       span:  *span, };
            tokens.next();
            Ok(expr)
        },

        Some((Token::Ident(name), span)) => {
            let (name, span) = (name.clone(), *span);
            tokens.next();

            if let Some((Token::LParen, _)) = tokens.peek() {
                tokens.next();
                let args = parse_comma_separated(tokens,
                                                 parse_expression,
                                                 &Token::RParen,
                                                 "Expected ',' or ')' in call arguments")?;
                return Ok(Expr::Call { callee: name,
                                       args,
                                       span });
            }

            Ok(Expr::Identifier { name, span })
        },

        Some((Token::LParen, _)) => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "Expected ')'")?;
            Ok(expr)
        },

        Some((Token::LBracket, span)) => {
            let span = *span;
            tokens.next();
            let elements = parse_comma_separated(tokens,
                                                 parse_expression,
                                                 &Token::RBracket,
                                                 "Expected ',' or ']' in array literal")?;
            Ok(Expr::ArrayLit { elements, span })
        },

        Some((Token::LBrace, span)) => {
            let span = *span;
            tokens.next();
            parse_map_literal(tokens, span)
        },

        other => Err(err_at(other, "Expected an expression")),
    }
}

/// Parses the entries of a map literal after the opening brace.
///
/// Keys must be string literals: `{ "a": 1, "b": 2 }`. An empty map `{}` is
/// accepted. Duplicate keys are allowed here; the evaluator keeps the last
/// value.
///
/// Grammar: `map := "{" [ STRING ":" expression ("," STRING ":" expression)* ] "}"`
fn parse_map_literal<'a, I>(tokens: &mut Peekable<I>, span: Span) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut entries = Vec::new();

    if let Some((Token::RBrace, _)) = tokens.peek() {
        tokens.next();
        return Ok(Expr::MapLit { entries, span });
    }

    loop {
        let key = match tokens.peek() {
            Some((Token::Str(key), _)) => {
                let key = key.clone();
                tokens.next();
                key
            },
            other => return Err(err_at(other, "Expected string key in map literal")),
        };

        expect(tokens, &Token::Colon, "Expected ':' after map key")?;

        let value = parse_expression(tokens)?;
        entries.push(MapEntry { key, value });

        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            other => return Err(err_at(other, "Expected ',' or '}' in map literal")),
        }
    }

    Ok(Expr::MapLit { entries, span })
}
