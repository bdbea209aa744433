use std::iter::Peekable;

use crate::{
    ast::{FunctionDecl, Span, Stmt},
    interpreter::{
        lexer::Token,
        parser::{
            block::{parse_block_until, skip_newlines},
            core::{ParseResult, parse_expression},
            utils::{err_at, expect, parse_comma_separated, parse_handle_number, parse_identifier},
        },
    },
};

/// Parses a single statement.
///
/// Dispatch is on the leading token. A statement starting with an identifier
/// is disambiguated by one token of lookahead: `[` begins an index
/// assignment, `=` an assignment, and `(` a call statement; anything else is
/// a syntax error at that position.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Span)` pairs.
///
/// # Returns
/// A parsed [`Stmt`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    match tokens.peek() {
        Some((Token::Print, _)) => parse_print(tokens),
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::While, _)) => parse_while(tokens),
        Some((Token::For, _)) => parse_for(tokens),
        Some((Token::Function, _)) => parse_function(tokens),
        Some((Token::Return, _)) => parse_return(tokens),
        Some((Token::Break, span)) => {
            let span = *span;
            tokens.next();
            Ok(Stmt::Break { span })
        },
        Some((Token::Continue, span)) => {
            let span = *span;
            tokens.next();
            Ok(Stmt::Continue { span })
        },
        Some((Token::Import, _)) => parse_import(tokens),
        Some((Token::Open, _)) => parse_open(tokens),
        Some((Token::Close, _)) => parse_close(tokens),

        Some((Token::Ident(_), _)) => {
            let mut lookahead = tokens.clone();
            lookahead.next();

            match lookahead.peek() {
                Some((Token::LBracket, _)) => parse_index_assign(tokens),
                Some((Token::Assign, _)) => parse_assign(tokens),
                Some((Token::LParen, _)) => parse_expr_statement(tokens),
                _ => Err(err_at(tokens.peek(), "Expected a statement")),
            }
        },

        other => Err(err_at(other, "Expected a statement")),
    }
}

/// Parses `print expr` or the handle form `print #N, expr`.
fn parse_print<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::Print, "Expected 'print'")?;

    if let Some((Token::Hash, _)) = tokens.peek() {
        tokens.next();
        let handle = parse_handle_number(tokens)?;
        expect(tokens, &Token::Comma, "Expected ',' after print handle")?;
        let value = parse_expression(tokens)?;
        return Ok(Stmt::PrintHandle { handle, value, span });
    }

    let value = parse_expression(tokens)?;
    Ok(Stmt::Print { value, span })
}

/// Parses `name = expr`.
fn parse_assign<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (name, span) = parse_identifier(tokens, "Expected a variable name")?;
    expect(tokens, &Token::Assign, "Expected '=' after variable name")?;
    let value = parse_expression(tokens)?;
    Ok(Stmt::Assign { name, value, span })
}

/// Parses `name[index] = expr`.
fn parse_index_assign<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (name, _) = parse_identifier(tokens, "Expected a variable name")?;
    let span = expect(tokens, &Token::LBracket, "Expected '[' after identifier")?;

    let index = parse_expression(tokens)?;
    expect(tokens, &Token::RBracket, "Expected ']' after index expression")?;
    expect(tokens, &Token::Assign, "Expected '=' after index expression")?;

    let value = parse_expression(tokens)?;
    Ok(Stmt::IndexAssign { name,
                           index,
                           value,
                           span })
}

/// Parses a call evaluated as a statement, e.g. `push(a, 1)`.
fn parse_expr_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = tokens.peek().map_or_else(Span::default, |(_, span)| *span);
    let expr = parse_expression(tokens)?;
    Ok(Stmt::Expression { expr, span })
}

/// Parses `return expr`.
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::Return, "Expected 'return'")?;
    let value = parse_expression(tokens)?;
    Ok(Stmt::Return { value, span })
}

/// Parses `import "path"`.
fn parse_import<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::Import, "Expected 'import'")?;
    match tokens.peek() {
        Some((Token::Str(path), _)) => {
            let path = path.clone();
            tokens.next();
            Ok(Stmt::Import { path, span })
        },
        other => Err(err_at(other, "Expected string path after 'import'")),
    }
}

/// Parses `open #N, path_expr, mode_expr`.
fn parse_open<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::Open, "Expected 'open'")?;
    expect(tokens, &Token::Hash, "Expected '#' after 'open'")?;
    let handle = parse_handle_number(tokens)?;
    expect(tokens, &Token::Comma, "Expected ',' after open handle")?;
    let path = parse_expression(tokens)?;
    expect(tokens, &Token::Comma, "Expected ',' after open path")?;
    let mode = parse_expression(tokens)?;
    Ok(Stmt::Open { handle,
                    path,
                    mode,
                    span })
}

/// Parses `close #N`.
fn parse_close<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::Close, "Expected 'close'")?;
    expect(tokens, &Token::Hash, "Expected '#' after 'close'")?;
    let handle = parse_handle_number(tokens)?;
    Ok(Stmt::Close { handle, span })
}

/// Parses `if cond NEWLINE block [else NEWLINE block] end`.
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::If, "Expected 'if'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::Newline, "Expected NEWLINE after if condition")?;
    skip_newlines(tokens);

    let then_branch = parse_block_until(tokens, &[Token::Else, Token::End])?;

    let mut else_branch = Vec::new();
    if let Some((Token::Else, _)) = tokens.peek() {
        tokens.next();
        expect(tokens, &Token::Newline, "Expected NEWLINE after else")?;
        skip_newlines(tokens);
        else_branch = parse_block_until(tokens, &[Token::End])?;
    }

    expect(tokens, &Token::End, "Expected 'end' to close if")?;

    Ok(Stmt::If { condition,
                  then_branch,
                  else_branch,
                  span })
}

/// Parses `while cond NEWLINE block end`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let span = expect(tokens, &Token::While, "Expected 'while'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::Newline, "Expected NEWLINE after while condition")?;
    skip_newlines(tokens);

    let body = parse_block_until(tokens, &[Token::End])?;
    expect(tokens, &Token::End, "Expected 'end' to close while")?;

    Ok(Stmt::While { condition, body, span })
}

/// Parses the two `for` forms: the counted loop and `for each`.
///
/// Counted: `for v = start to end [step s] NEWLINE block end`
/// Each:    `for each v [, i] in iterable NEWLINE block end`
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let for_span = expect(tokens, &Token::For, "Expected 'for'")?;

    if let Some((Token::Each, _)) = tokens.peek() {
        tokens.next();
        return parse_for_each(tokens, for_span);
    }

    let (var, span) = parse_identifier(tokens, "Expected loop variable after 'for'")?;
    expect(tokens, &Token::Assign, "Expected '=' after loop variable")?;
    let start = parse_expression(tokens)?;
    expect(tokens, &Token::To, "Expected 'to' in for loop")?;
    let end = parse_expression(tokens)?;

    let mut step = None;
    if let Some((Token::Step, _)) = tokens.peek() {
        tokens.next();
        step = Some(parse_expression(tokens)?);
    }

    expect(tokens, &Token::Newline, "Expected NEWLINE after for header")?;
    skip_newlines(tokens);

    let body = parse_block_until(tokens, &[Token::End])?;
    expect(tokens, &Token::End, "Expected 'end' to close for")?;

    Ok(Stmt::For { var,
                   start,
                   end,
                   step,
                   body,
                   span })
}

/// Parses the remainder of `for each` after the `each` keyword.
fn parse_for_each<'a, I>(tokens: &mut Peekable<I>, span: Span) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (var, _) = parse_identifier(tokens, "Expected loop variable after 'each'")?;

    let mut index_var = None;
    if let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        let (index_name, _) = parse_identifier(tokens, "Expected index variable after ','")?;
        index_var = Some(index_name);
    }

    expect(tokens, &Token::In, "Expected 'in' in for each")?;
    let iterable = parse_expression(tokens)?;
    expect(tokens, &Token::Newline, "Expected NEWLINE after for each header")?;
    skip_newlines(tokens);

    let body = parse_block_until(tokens, &[Token::End])?;
    expect(tokens, &Token::End, "Expected 'end' to close for each")?;

    Ok(Stmt::ForEach { var,
                       index_var,
                       iterable,
                       body,
                       span })
}

/// Parses `function name(params) NEWLINE block end`.
fn parse_function<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    expect(tokens, &Token::Function, "Expected 'function'")?;
    let (name, span) = parse_identifier(tokens, "Expected function name after 'function'")?;

    expect(tokens, &Token::LParen, "Expected '(' after function name")?;
    let params = parse_comma_separated(tokens,
                                       |tokens| {
                                           parse_identifier(tokens, "Expected parameter name")
                                               .map(|(name, _)| name)
                                       },
                                       &Token::RParen,
                                       "Expected ',' or ')' in parameter list")?;

    expect(tokens, &Token::Newline, "Expected NEWLINE after function header")?;
    skip_newlines(tokens);

    let body = parse_block_until(tokens, &[Token::End])?;
    expect(tokens, &Token::End, "Expected 'end' to close function")?;

    Ok(Stmt::Function(FunctionDecl { name,
                                     params,
                                     body,
                                     span }))
}
