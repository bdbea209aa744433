/// Core evaluation logic and interpreter state.
///
/// Contains the `Interpreter` struct, the control-flow signal type, statement
/// execution, and expression dispatch.
pub mod core;

/// Binary operator evaluation.
///
/// Implements evaluation for all binary operations, including the overloaded
/// `+`, arithmetic, comparisons, equality, and short-circuiting logic.
pub mod binary;

/// Unary operator evaluation.
///
/// Implements `not`.
pub mod unary;

/// Loop execution.
///
/// Runs `while`, counted `for`, and `for each` loops, consuming `break` and
/// `continue` signals.
pub mod loops;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, call
/// frames, and the built-in library.
pub mod function;

/// File-handle management.
///
/// Owns the numbered handle table behind `open`, `close`, `print #`,
/// `lineinput`, and `eof`.
pub mod files;

/// Module loading.
///
/// Resolves `import` paths, detects cycles, and caches loaded modules so each
/// executes at most once.
pub mod modules;

/// Interpreter introspection.
///
/// Snapshot accessors over globals, user functions, and module states for
/// external drivers.
pub mod inspect;

/// Utility functions for the evaluator.
///
/// Environment helpers, diagnostic construction, and index coercion shared by
/// the evaluation logic.
pub mod utils;
