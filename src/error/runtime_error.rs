use crate::ast::Span;

#[derive(Debug, Clone)]
/// Represents all errors that can occur during evaluation.
///
/// Every variant carries the span of the construct that failed. The `Display`
/// impl renders only the bare message; position, source line, caret, and call
/// stack are added by [`crate::error::Diagnostic`].
pub enum RuntimeError {
    /// Read of a variable that is not bound in the current scope or globals.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source position where the error occurred.
        span: Span,
    },
    /// Call of a name that is neither a user function nor a built-in.
    UndefinedFunction {
        /// The name of the function.
        name: String,
        /// The source position where the error occurred.
        span: Span,
    },
    /// An `if` or `while` condition evaluated to a non-boolean.
    ConditionNotBool {
        /// The construct whose condition failed (`"If"` or `"While"`).
        construct: &'static str,
        /// The source position where the error occurred.
        span:      Span,
    },
    /// An operator was applied to operands of the wrong type.
    OperandType {
        /// The operator as written in source.
        op:       String,
        /// A description of the required operand types.
        expected: &'static str,
        /// The source position where the error occurred.
        span:     Span,
    },
    /// Indexing was attempted on a value that is not an array or map.
    NotIndexable {
        /// The source position where the error occurred.
        span: Span,
    },
    /// Index assignment targeted a value that is not an array or map.
    IndexAssignTarget {
        /// The source position where the error occurred.
        span: Span,
    },
    /// An array index expression was not a number.
    IndexNotNumber {
        /// The source position where the error occurred.
        span: Span,
    },
    /// An array index was a number with a fractional part.
    IndexNotInteger {
        /// The source position where the error occurred.
        span: Span,
    },
    /// An array index was outside `[0, len)`.
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The length of the array.
        size:  usize,
        /// The source position where the error occurred.
        span:  Span,
    },
    /// A map was indexed with a non-string key.
    KeyNotString {
        /// The source position where the error occurred.
        span: Span,
    },
    /// A map read used a key that is not present.
    KeyNotFound {
        /// The missing key.
        key:  String,
        /// The source position where the error occurred.
        span: Span,
    },
    /// A user function was called with the wrong number of arguments.
    ArityMismatch {
        /// The name of the function.
        name:     String,
        /// The declared parameter count.
        expected: usize,
        /// The number of arguments supplied.
        got:      usize,
        /// The source position where the error occurred.
        span:     Span,
    },
    /// A user function body finished without executing `return`.
    NoReturnValue {
        /// The name of the function.
        name: String,
        /// The source position where the error occurred.
        span: Span,
    },
    /// `return` was executed outside any function.
    ReturnOutsideFunction {
        /// The source position where the error occurred.
        span: Span,
    },
    /// `break` was executed outside any loop.
    BreakOutsideLoop {
        /// The source position where the error occurred.
        span: Span,
    },
    /// `continue` was executed outside any loop.
    ContinueOutsideLoop {
        /// The source position where the error occurred.
        span: Span,
    },
    /// A `for` bound did not evaluate to a number.
    ForBoundsNotNumber {
        /// The source position where the error occurred.
        span: Span,
    },
    /// An explicit `step` was zero or not a number.
    ForStepInvalid {
        /// The source position where the error occurred.
        span: Span,
    },
    /// The loop variable was mutated to a non-number mid-loop.
    ForVarNotNumber {
        /// The source position where the error occurred.
        span: Span,
    },
    /// `for each` was applied to a value that is not an array or map.
    ForEachNotIterable {
        /// The source position where the error occurred.
        span: Span,
    },
    /// A file-handle number was zero, negative, or fractional.
    InvalidHandle {
        /// The operation that rejected the handle (`"open"`, `"lineinput()"`, ...).
        what: &'static str,
        /// The source position where the error occurred.
        span: Span,
    },
    /// An operation referenced a handle with no open file behind it.
    HandleNotOpen {
        /// The failing operation (`"close"` or `"print"`).
        op:     &'static str,
        /// The handle number.
        handle: i64,
        /// The source position where the error occurred.
        span:   Span,
    },
    /// An `open` mode was not one of `"r"`, `"w"`, `"a"`.
    InvalidMode {
        /// The source position where the error occurred.
        span: Span,
    },
    /// A statement or built-in was used with invalid arguments.
    Usage {
        /// A full description of the misuse.
        message: String,
        /// The source position where the error occurred.
        span:    Span,
    },
    /// An underlying I/O operation failed.
    Io {
        /// A full description of the failure.
        message: String,
        /// The source position where the error occurred.
        span:    Span,
    },
    /// An imported path matched none of the resolution candidates.
    ImportNotFound {
        /// The path as written in the `import` statement.
        path:  String,
        /// Every candidate path that was tried, in order.
        tried: Vec<String>,
        /// The source position where the error occurred.
        span:  Span,
    },
    /// An import closed a cycle in the in-progress module chain.
    CircularImport {
        /// The stack of modules currently loading, outermost first.
        stack:  Vec<String>,
        /// The module that would have been loaded again.
        target: String,
        /// The source position where the error occurred.
        span:   Span,
    },
    /// A module was found but could not be read or parsed.
    ImportFailed {
        /// The resolved module path.
        path:    String,
        /// The underlying read or parse failure.
        details: String,
        /// The source position where the error occurred.
        span:    Span,
    },
}

impl RuntimeError {
    /// Gets the source span the error occurred at.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::ConditionNotBool { span, .. }
            | Self::OperandType { span, .. }
            | Self::NotIndexable { span }
            | Self::IndexAssignTarget { span }
            | Self::IndexNotNumber { span }
            | Self::IndexNotInteger { span }
            | Self::IndexOutOfBounds { span, .. }
            | Self::KeyNotString { span }
            | Self::KeyNotFound { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::NoReturnValue { span, .. }
            | Self::ReturnOutsideFunction { span }
            | Self::BreakOutsideLoop { span }
            | Self::ContinueOutsideLoop { span }
            | Self::ForBoundsNotNumber { span }
            | Self::ForStepInvalid { span }
            | Self::ForVarNotNumber { span }
            | Self::ForEachNotIterable { span }
            | Self::InvalidHandle { span, .. }
            | Self::HandleNotOpen { span, .. }
            | Self::InvalidMode { span }
            | Self::Usage { span, .. }
            | Self::Io { span, .. }
            | Self::ImportNotFound { span, .. }
            | Self::CircularImport { span, .. }
            | Self::ImportFailed { span, .. } => *span,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, .. } => write!(f, "Undefined variable {name:?}"),
            Self::UndefinedFunction { name, .. } => write!(f, "Undefined function {name:?}"),
            Self::ConditionNotBool { construct, .. } => {
                write!(f, "{construct} condition must be boolean")
            },
            Self::OperandType { op, expected, .. } => {
                write!(f, "Operator {op:?} requires {expected}")
            },
            Self::NotIndexable { .. } => write!(f, "Indexing requires an array or map"),
            Self::IndexAssignTarget { .. } => {
                write!(f, "Index assignment requires an array or map")
            },
            Self::IndexNotNumber { .. } => write!(f, "Array index must be a number"),
            Self::IndexNotInteger { .. } => write!(f, "Array index must be an integer"),
            Self::IndexOutOfBounds { index, size, .. } => {
                write!(f, "Array index out of bounds (index {index}, size {size})")
            },
            Self::KeyNotString { .. } => write!(f, "Map key must be a string"),
            Self::KeyNotFound { key, .. } => write!(f, "Map key {key:?} not found"),
            Self::ArityMismatch { name,
                                  expected,
                                  got,
                                  .. } => {
                write!(f, "Function {name:?} expects {expected} args, got {got}")
            },
            Self::NoReturnValue { name, .. } => {
                write!(f, "Function {name:?} ended without return")
            },
            Self::ReturnOutsideFunction { .. } => {
                write!(f, "Return is only valid inside a function")
            },
            Self::BreakOutsideLoop { .. } => write!(f, "Break is only valid inside a loop"),
            Self::ContinueOutsideLoop { .. } => write!(f, "Continue is only valid inside a loop"),
            Self::ForBoundsNotNumber { .. } => write!(f, "For loop start/end must be numbers"),
            Self::ForStepInvalid { .. } => write!(f, "For loop step must be a non-zero number"),
            Self::ForVarNotNumber { .. } => write!(f, "For loop variable must remain numeric"),
            Self::ForEachNotIterable { .. } => write!(f, "foreach expects an array or map"),
            Self::InvalidHandle { what, .. } => {
                write!(f, "{what} handle must be a positive integer")
            },
            Self::HandleNotOpen { op, handle, .. } => {
                write!(f, "{op} failed: handle #{handle} is not open")
            },
            Self::InvalidMode { .. } => write!(f, "open mode must be \"r\", \"w\", or \"a\""),
            Self::Usage { message, .. } | Self::Io { message, .. } => write!(f, "{message}"),
            Self::ImportNotFound { path, tried, .. } => {
                write!(f, "import failed: file not found {path:?}")?;
                if !tried.is_empty() {
                    write!(f, "\nTried:")?;
                    for candidate in tried {
                        write!(f, "\n  {candidate}")?;
                    }
                }
                Ok(())
            },
            Self::CircularImport { stack, target, .. } => {
                write!(f, "Circular import detected:")?;
                for path in stack {
                    write!(f, "\n  {path}")?;
                }
                write!(f, "\n  {target}")
            },
            Self::ImportFailed { path, details, .. } => {
                write!(f, "import failed for {path:?}: {details}")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
