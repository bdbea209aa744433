use std::iter::Peekable;

use crate::{
    ast::Span,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Builds a parse error at the given token, or an end-of-input error when the
/// stream is exhausted.
///
/// All parser error messages flow through here so they render uniformly as
/// `<message> at <line>:<col> (got <KIND>)` or `<message> at end of file`.
pub(in crate::interpreter::parser) fn err_at(token: Option<&&(Token, Span)>,
                                             message: &str)
                                             -> ParseError {
    match token {
        Some((token, span)) => ParseError::UnexpectedToken { message: message.to_string(),
                                                             got:     token.kind_name()
                                                                           .to_string(),
                                                             span:    *span, },
        None => ParseError::UnexpectedEof { message: message.to_string() },
    }
}

/// Consumes the next token, which must equal `expected`, and returns its
/// span.
///
/// Only used for tokens without payloads; identifiers, numbers, and strings
/// have dedicated parsers.
///
/// # Errors
/// Returns a `ParseError` carrying `message` when the next token differs or
/// the stream ends.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    message: &str)
                                                    -> ParseResult<Span>
    where I: Iterator<Item = &'a (Token, Span)>
{
    match tokens.peek() {
        Some((token, span)) if token == expected => {
            let span = *span;
            tokens.next();
            Ok(span)
        },
        other => Err(err_at(other, message)),
    }
}

/// Parses a plain identifier and returns its name and span.
///
/// # Errors
/// Returns a `ParseError` carrying `message` when the next token is not an
/// identifier or the input ends.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              message: &str)
                                                              -> ParseResult<(String, Span)>
    where I: Iterator<Item = &'a (Token, Span)>
{
    match tokens.peek() {
        Some((Token::Ident(name), span)) => {
            let result = (name.clone(), *span);
            tokens.next();
            Ok(result)
        },
        other => Err(err_at(other, message)),
    }
}

/// Parses a file-handle number following a `#` prefix.
///
/// The token must be a numeric literal with an integer value; positivity is
/// checked at runtime so that the error carries the statement's span.
pub(in crate::interpreter::parser) fn parse_handle_number<'a, I>(tokens: &mut Peekable<I>)
                                                                 -> ParseResult<i64>
    where I: Iterator<Item = &'a (Token, Span)>
{
    match tokens.peek() {
        Some((Token::Number(n), span)) => {
            let (value, span) = (*n, *span);
            #[allow(clippy::cast_possible_truncation)]
            let handle = value as i64;

            #[allow(clippy::float_cmp)]
            if handle as f64 != value {
                return Err(ParseError::UnexpectedToken { message:
                                                             "Expected an integer handle number".to_string(),
                                                         got: "NUMBER".to_string(),
                                                         span });
            }
            tokens.next();
            Ok(handle)
        },
        other => Err(err_at(other, "Expected handle number after '#'")),
    }
}

/// Parses a comma-separated list of items, consuming the closing token.
///
/// This utility is shared by array literals, call arguments, and parameter
/// lists. It repeatedly calls `parse_item` to parse one element, expecting
/// either a comma to continue the list or `closing` to end it. An immediately
/// encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := [ item ("," item)* ] closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g. `]` or `)`).
/// - `message`: Error message used when neither a comma nor `closing` follows
///   an item.
///
/// # Returns
/// A vector of parsed items.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    message: &str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut items = Vec::new();

    if let Some((token, _)) = tokens.peek()
       && token == closing
    {
        tokens.next();
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((token, _)) if token == closing => {
                tokens.next();
                break;
            },
            other => return Err(err_at(other, message)),
        }
    }

    Ok(items)
}
