use std::collections::HashMap;

use crate::{
    ast::Span,
    error::{Diagnostic, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        lexer::normalize_newlines,
        value::core::Value,
    },
};

/// Splits a source text into lines for diagnostic rendering.
///
/// Line endings are normalized first so that `lines[span.line - 1]` is the
/// text the lexer saw. An empty source yields no lines.
pub(crate) fn split_lines(source: &str) -> Vec<String> {
    if source.is_empty() {
        return Vec::new();
    }
    normalize_newlines(source).split('\n')
                              .map(ToString::to_string)
                              .collect()
}

impl Interpreter {
    /// Whether execution is currently inside a function call.
    pub(crate) fn in_function(&self) -> bool {
        !self.locals.is_empty()
    }

    /// The environment writes currently target: the top call frame inside a
    /// function, the globals otherwise.
    pub(crate) fn current_env(&mut self) -> &mut HashMap<String, Value> {
        match self.locals.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    /// Resolves a variable read: the top frame first (when in a function),
    /// then the globals. There are no closures and no access to outer
    /// frames.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(frame) = self.locals.last()
           && let Some(value) = frame.get(name)
        {
            return Some(value);
        }
        self.globals.get(name)
    }

    /// Pushes a fresh call frame.
    pub(crate) fn push_frame(&mut self) {
        self.locals.push(HashMap::new());
    }

    /// Destroys the top call frame.
    pub(crate) fn pop_frame(&mut self) {
        self.locals.pop();
    }

    /// Wraps a bare error into a [`Diagnostic`], capturing the current
    /// filename, the offending source line, and a copy of the call stack
    /// (innermost function first).
    ///
    /// Context is captured here, at the point of failure, because the
    /// filename and line table may be swapped back before the error reaches
    /// the caller (module execution restores the importer's context).
    pub(crate) fn fail(&self, error: RuntimeError) -> Diagnostic {
        let span = error.span();

        let source_line = if span.line > 0 && span.line <= self.lines.len() {
            self.lines[span.line - 1].clone()
        } else {
            String::new()
        };

        let stack = self.call_stack.iter().rev().cloned().collect();

        Diagnostic { error,
                     file: self.filename.clone(),
                     source_line,
                     stack }
    }

    /// Coerces a value into an array index.
    ///
    /// The value must be a number with no fractional part; range checking is
    /// the caller's job since valid ranges differ between reads, writes, and
    /// `insert`.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub(crate) fn to_index(&self, value: &Value, span: Span) -> EvalResult<i64> {
        match value {
            Value::Number(n) => {
                let idx = *n as i64;
                if idx as f64 != *n {
                    return Err(self.fail(RuntimeError::IndexNotInteger { span }));
                }
                Ok(idx)
            },
            _ => Err(self.fail(RuntimeError::IndexNotNumber { span })),
        }
    }
}
