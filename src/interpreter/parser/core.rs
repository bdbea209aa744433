use std::iter::Peekable;

use crate::{
    ast::{Expr, Span, Stmt},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_or, block::skip_newlines, statement::parse_statement},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream into a program.
///
/// This is the main entry point used by the runner and the module loader.
///
/// # Errors
/// Returns the first [`ParseError`] encountered; there is no recovery.
///
/// # Example
/// ```
/// use bpl::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("x = 1\nprint x\n").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse(tokens: &[(Token, Span)]) -> ParseResult<Vec<Stmt>> {
    let mut iter = tokens.iter().peekable();
    parse_program(&mut iter)
}

/// Parses statements separated by newlines until the stream is exhausted.
///
/// Grammar: `program := { NEWLINE } stmt { NEWLINE stmt } { NEWLINE } EOF`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Span)` pairs.
///
/// # Returns
/// The list of parsed statements.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_newlines(tokens);
        if tokens.peek().is_none() {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    Ok(statements)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical OR, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Span)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_or(tokens)
}
