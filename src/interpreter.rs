/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the parsed program, executes statements, evaluates
/// expressions, manages the global and call-local environments, dispatches
/// user and built-in function calls, loads modules, and tracks open file
/// handles. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Executes statements and evaluates expressions over the runtime values.
/// - Implements non-local control flow (`return`, `break`, `continue`) as
///   typed signals consumed by their enclosing constructs.
/// - Raises runtime errors with full source context and call stack.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// tagged with its 1-based line and column. Newlines are significant and are
/// emitted as tokens of their own; the parser uses them as statement
/// terminators.
///
/// # Responsibilities
/// - Converts the input into tokens with kind, lexeme, and source location.
/// - Recognizes keywords in lower, UPPER, and Capitalized forms.
/// - Distinguishes `#` comments from `#N` file-handle prefixes.
/// - Reports lexical errors for stray characters and unterminated strings.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// the statement list that the evaluator executes. Statements are terminated
/// by newlines; block constructs run to a matching `end`.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates the grammar, reporting errors with position and token kind.
/// - Resolves the statement-start ambiguity between assignment, index
///   assignment, and call statements.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the tagged value type used during execution: null,
/// numbers, strings, booleans, and the two shared-reference container kinds
/// (arrays and maps). It also owns the canonical string rendering used by
/// `print`, `str`, and string concatenation.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Gives arrays and maps shared-reference semantics.
/// - Implements the canonical rendering rules.
pub mod value;
