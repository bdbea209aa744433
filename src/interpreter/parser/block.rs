use std::iter::Peekable;

use crate::{
    ast::{Span, Stmt},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, statement::parse_statement},
    },
};

/// Consumes any run of newline tokens.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, Span)>
{
    while let Some((Token::Newline, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Parses statements until one of `terminators` (or end of input) is next.
///
/// The terminating token is left in the stream; the caller consumes it and
/// reports its own error when the block ran to end of input instead.
///
/// Newlines between statements are skipped.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first statement of the block.
/// - `terminators`: Tokens that end the block (e.g. `end`, or `else`/`end`
///   for the then-branch of an `if`).
///
/// # Returns
/// The statements of the block.
pub(in crate::interpreter::parser) fn parse_block_until<'a, I>(tokens: &mut Peekable<I>,
                                                               terminators: &[Token])
                                                               -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut block = Vec::new();

    loop {
        skip_newlines(tokens);

        match tokens.peek() {
            None => break,
            Some((token, _)) if terminators.contains(token) => break,
            Some(_) => block.push(parse_statement(tokens)?),
        }
    }

    Ok(block)
}
