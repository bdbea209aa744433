use std::io::Write;

use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Renders any value to its canonical string form.
///
/// # Example
/// ```
/// use bpl::interpreter::{
///     evaluator::core::Interpreter, evaluator::function::builtin::str_fn, value::core::Value,
/// };
/// use bpl::ast::Span;
///
/// let mut interp = Interpreter::with_source("", "");
/// let result = str_fn(&mut interp, &[Value::Number(3.0)], Span::default()).unwrap();
///
/// assert_eq!(result, Value::Str("3".to_string()));
/// ```
pub fn str_fn(_interp: &mut Interpreter, args: &[Value], _span: Span) -> EvalResult<Value> {
    Ok(Value::Str(args[0].to_string()))
}

/// Converts a value to a number.
///
/// Numbers pass through unchanged; anything else is rendered and parsed
/// after trimming surrounding whitespace. A string that does not parse as a
/// number is an error.
pub fn num(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    if let Value::Number(_) = &args[0] {
        return Ok(args[0].clone());
    }

    let text = args[0].to_string();
    match text.trim().parse::<f64>() {
        Ok(n) => Ok(Value::Number(n)),
        Err(_) => Err(interp.fail(RuntimeError::Usage { message:
                                                            format!("num() could not parse {text:?}"),
                                                        span })),
    }
}

/// The length of a string (code points), array (elements), or map
/// (entries).
#[allow(clippy::cast_precision_loss)]
pub fn len(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(elements) => Ok(Value::Number(elements.borrow().len() as f64)),
        Value::Map(entries) => Ok(Value::Number(entries.borrow().len() as f64)),
        _ => Err(interp.fail(RuntimeError::Usage { message:
                                                       "len() expects a string, array, or map".to_string(),
                                                   span })),
    }
}

/// Reads one line from the interpreter's input stream.
///
/// An optional prompt is written (without a newline) first. The trailing
/// line ending is stripped; end of input yields an empty string.
pub fn input(interp: &mut Interpreter, args: &[Value], _span: Span) -> EvalResult<Value> {
    if let Some(prompt) = args.first() {
        let _ = write!(interp.out, "{prompt}");
        let _ = interp.out.flush();
    }

    let mut line = String::new();
    let _ = interp.input.read_line(&mut line);

    Ok(Value::Str(line.trim_end_matches(['\r', '\n']).to_string()))
}
