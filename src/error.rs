/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unexpected tokens, illegal
/// characters, and unterminated literals, and render as a single line with
/// the offending position and token kind.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: undefined
/// names, type mismatches, arity mismatches, bad indexing, import failures,
/// and file-handle misuse. Each variant carries the span it occurred at and
/// renders as a bare message without position information.
pub mod runtime_error;
/// Rendered runtime diagnostics.
///
/// Combines a runtime error with the source context captured at the point of
/// failure: filename, the offending source line, and the call stack. The
/// rendering places a caret under the failing column.
pub mod diagnostic;

pub use diagnostic::Diagnostic;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
