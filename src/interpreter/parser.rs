/// Core parsing entry points.
///
/// Exposes the `parse` entry point for whole programs and the shared
/// `parse_expression` root of the precedence hierarchy.
pub mod core;

/// Statement parsing.
///
/// Dispatches on the leading token of each statement and implements every
/// statement form, including the statement-start disambiguation between
/// assignment, index assignment, and call statements.
pub mod statement;

/// Binary expression parsing.
///
/// Implements the precedence levels from `or` down to multiplication.
/// Comparisons are non-associative: at most one per level.
pub mod binary;

/// Unary, postfix, and primary expression parsing.
///
/// Handles `not`, repeatable indexing, literals, identifiers, calls,
/// parenthesized expressions, and array and map literals.
pub mod unary;

/// Block parsing.
///
/// Collects statements up to (but not including) a terminating keyword such
/// as `end` or `else`, skipping the newlines between them.
pub mod block;

/// Shared parsing utilities.
///
/// Error construction, token expectation, and comma-separated list parsing
/// used across the other parser modules.
pub mod utils;
