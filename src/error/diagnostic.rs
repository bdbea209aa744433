use crate::error::RuntimeError;

/// A runtime error together with the source context captured when it was
/// raised.
///
/// The context is recorded at the point of failure rather than at the point
/// of reporting, so an error inside an imported module renders against the
/// module's own filename and source text even though the importer's context
/// has been restored by the time the error reaches the caller.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The underlying runtime error.
    pub error:       RuntimeError,
    /// The filename active when the error was raised.
    pub file:        String,
    /// The text of the offending source line (empty when unavailable).
    pub source_line: String,
    /// Call stack at the point of failure, innermost function first.
    pub stack:       Vec<String>,
}

impl std::fmt::Display for Diagnostic {
    /// Renders the diagnostic in the form:
    ///
    /// ```text
    /// Runtime error at file.bpl:3:7
    ///   Undefined variable "x"
    ///   3 | print x
    ///             ^
    /// Stack:
    ///   at inner()
    ///   at outer()
    /// ```
    ///
    /// The caret is aligned under the failing column; the stack section is
    /// omitted when the error occurred at the top level.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.error.span();

        let location = if self.file.is_empty() || span.line == 0 || span.col == 0 {
            "unknown:0:0".to_string()
        } else {
            format!("{}:{}:{}", self.file, span.line, span.col)
        };

        write!(f, "Runtime error at {location}")?;
        write!(f, "\n  {}", self.error)?;

        if !self.source_line.is_empty() && span.line > 0 {
            let prefix = format!("  {} | ", span.line);
            write!(f, "\n{prefix}{}", self.source_line)?;

            let caret_offset = prefix.len() + span.col.saturating_sub(1);
            write!(f, "\n{}^", " ".repeat(caret_offset))?;
        }

        if !self.stack.is_empty() {
            write!(f, "\nStack:")?;
            for function in &self.stack {
                write!(f, "\n  at {function}()")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Diagnostic {}
