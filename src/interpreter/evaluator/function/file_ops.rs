use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use crate::{
    ast::Span,
    error::{Diagnostic, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Reads an entire file into a string.
pub fn readfile(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Str(path) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "readfile() expects 1 string arg".to_string(),
                                                     span }));
    };

    match fs::read_to_string(path) {
        Ok(contents) => Ok(Value::Str(contents)),
        Err(e) => Err(interp.fail(RuntimeError::Io { message: format!("readfile() failed: {e}"),
                                                     span })),
    }
}

/// Writes the canonical rendering of a value to a file, truncating it.
pub fn writefile(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Str(path) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "writefile() path must be a string".to_string(),
                                                     span }));
    };

    match fs::write(path, args[1].to_string()) {
        Ok(()) => Ok(Value::Null),
        Err(e) => Err(interp.fail(RuntimeError::Io { message: format!("writefile() failed: {e}"),
                                                     span })),
    }
}

/// Appends the canonical rendering of a value to a file, creating it if
/// missing.
pub fn appendfile(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Str(path) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "appendfile() path must be a string".to_string(),
                                                     span }));
    };

    let result = OpenOptions::new().create(true)
                                   .append(true)
                                   .open(path)
                                   .and_then(|mut file| {
                                       file.write_all(args[1].to_string().as_bytes())
                                   });

    match result {
        Ok(()) => Ok(Value::Null),
        Err(e) => Err(interp.fail(RuntimeError::Io { message: format!("appendfile() failed: {e}"),
                                                     span })),
    }
}

/// Whether a path exists on the filesystem.
pub fn exists(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Str(path) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "exists() expects 1 string arg".to_string(),
                                                     span }));
    };

    Ok(Value::Bool(Path::new(path).exists()))
}

/// Reads one line from an open handle.
///
/// Returns the line without its terminator, the final unterminated line as
/// written, or `null` at true end of file.
pub fn lineinput(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let handle = handle_arg(interp, &args[0], "lineinput()", span)?;

    match interp.read_handle_line(handle) {
        Ok(Some(line)) => Ok(Value::Str(line)),
        Ok(None) => Ok(Value::Null),
        Err(message) => {
            Err(interp.fail(RuntimeError::Io { message: format!("lineinput() failed: {message}"),
                                               span }))
        },
    }
}

/// Whether the next read on a handle would hit end of file.
///
/// An unopened handle reports `true`.
pub fn eof(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let handle = handle_arg(interp, &args[0], "eof()", span)?;

    match interp.handle_at_eof(handle) {
        Ok(at_eof) => Ok(Value::Bool(at_eof)),
        Err(message) => Err(interp.fail(RuntimeError::Io { message:
                                                               format!("eof() failed: {message}"),
                                                           span })),
    }
}

/// Validates a handle argument: a positive integer-valued number.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn handle_arg(interp: &Interpreter,
              value: &Value,
              what: &'static str,
              span: Span)
              -> Result<i64, Diagnostic> {
    if let Value::Number(n) = value {
        let handle = *n as i64;
        if handle as f64 == *n && handle > 0 {
            return Ok(handle);
        }
    }
    Err(interp.fail(RuntimeError::InvalidHandle { what, span }))
}
