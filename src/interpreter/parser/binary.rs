use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr, Span},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses logical OR expressions.
///
/// Grammar: `or := and ("or" and)*`
///
/// # Parameters
/// - `tokens`: Token stream with span information.
///
/// # Returns
/// An `Expr::Binary` tree representing the parsed expression.
pub fn parse_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = parse_and(tokens)?;

    while let Some((Token::Or, span)) = tokens.peek() {
        let span = *span;
        tokens.next();
        let right = parse_and(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op: BinaryOp::Or,
                              right: Box::new(right),
                              span };
    }

    Ok(left)
}

/// Parses logical AND expressions.
///
/// Grammar: `and := comparison ("and" comparison)*`
pub fn parse_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = parse_comparison(tokens)?;

    while let Some((Token::And, span)) = tokens.peek() {
        let span = *span;
        tokens.next();
        let right = parse_comparison(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op: BinaryOp::And,
                              right: Box::new(right),
                              span };
    }

    Ok(left)
}

/// Parses comparison expressions.
///
/// Comparisons are non-associative: at most one `== != < > <= >=` is
/// accepted at this level, so `a < b < c` is a parse error at the second
/// operator rather than a chained comparison.
///
/// Grammar: `comparison := additive [ compare_op additive ]`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let left = parse_additive(tokens)?;

    if let Some((token, span)) = tokens.peek()
       && let Some(op) = comparison_op(token)
    {
        let span = *span;
        tokens.next();
        let right = parse_additive(tokens)?;
        return Ok(Expr::Binary { left: Box::new(left),
                                 op,
                                 right: Box::new(right),
                                 span });
    }

    Ok(left)
}

/// Parses addition and subtraction expressions.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;

    loop {
        let (op, span) = match tokens.peek() {
            Some((Token::Plus, span)) => (BinaryOp::Add, *span),
            Some((Token::Minus, span)) => (BinaryOp::Sub, *span),
            _ => break,
        };
        tokens.next();
        let right = parse_multiplicative(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              span };
    }

    Ok(left)
}

/// Parses multiplication and division expressions.
///
/// Grammar: `multiplicative := unary (("*" | "/") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = parse_unary(tokens)?;

    loop {
        let (op, span) = match tokens.peek() {
            Some((Token::Star, span)) => (BinaryOp::Mul, *span),
            Some((Token::Slash, span)) => (BinaryOp::Div, *span),
            _ => break,
        };
        tokens.next();
        let right = parse_unary(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              span };
    }

    Ok(left)
}

/// Maps a token to its comparison operator, if it is one.
const fn comparison_op(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Eq => Some(BinaryOp::Equal),
        Token::NotEq => Some(BinaryOp::NotEqual),
        Token::Less => Some(BinaryOp::Less),
        Token::Greater => Some(BinaryOp::Greater),
        Token::LessEq => Some(BinaryOp::LessEqual),
        Token::GreaterEq => Some(BinaryOp::GreaterEqual),
        _ => None,
    }
}
